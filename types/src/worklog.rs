//! Work-hour and profit aggregation over JIRA worklogs.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::jira::{Issue, JiraUser, Project, WorklogAuthor};

pub const SECONDS_PER_HOUR: f64 = 3600.0;

impl Issue {
    pub fn logged_seconds(&self) -> u64 {
        self.worklogs().iter().map(|w| w.time_spent_seconds).sum()
    }

    pub fn logged_seconds_by(&self, account_id: &str) -> u64 {
        self.worklogs()
            .iter()
            .filter(|w| w.author.account_id == account_id)
            .map(|w| w.time_spent_seconds)
            .sum()
    }
}

pub fn issue_seconds(issue: &Issue) -> u64 {
    issue.logged_seconds()
}

pub fn project_seconds(issues: &[Issue]) -> u64 {
    issues.iter().map(issue_seconds).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MemberRole {
    Assignee,
    Reporter,
    Contributor,
}

impl MemberRole {
    pub fn label(self) -> &'static str {
        match self {
            MemberRole::Assignee => "Assignee",
            MemberRole::Reporter => "Reporter",
            MemberRole::Contributor => "Contributor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub account_id: String,
    pub display_name: String,
    pub email_address: Option<String>,
    pub avatar_url: Option<String>,
    pub roles: BTreeSet<MemberRole>,
    /// Issues the member is assigned to or reported.
    pub issue_count: u32,
    pub work_seconds: u64,
}

impl TeamMember {
    fn from_user(user: &JiraUser) -> Self {
        Self {
            account_id: user.account_id.clone(),
            display_name: user.display_name.clone(),
            email_address: user.email_address.clone(),
            avatar_url: user.avatar_urls.small.clone(),
            roles: BTreeSet::new(),
            issue_count: 0,
            work_seconds: 0,
        }
    }

    fn from_author(author: &WorklogAuthor) -> Self {
        Self {
            account_id: author.account_id.clone(),
            display_name: author.display_name.clone(),
            email_address: author.email_address.clone(),
            avatar_url: author
                .avatar_urls
                .clone()
                .and_then(|avatar| avatar.into_urls().small),
            roles: BTreeSet::new(),
            issue_count: 0,
            work_seconds: 0,
        }
    }
}

fn member_for<'a>(
    members: &'a mut HashMap<String, TeamMember>,
    user: &JiraUser,
) -> &'a mut TeamMember {
    members
        .entry(user.account_id.clone())
        .or_insert_with(|| TeamMember::from_user(user))
}

/// Everyone who touched `issues`, with the seconds they logged.
///
/// Per issue the assignee is counted first, then the reporter unless they are
/// the same person, then any remaining worklog authors as contributors. Each
/// worklog lands on exactly one member. Sorted by logged time, then issue
/// count (both descending), then name.
pub fn team_members(issues: &[Issue]) -> Vec<TeamMember> {
    let mut members: HashMap<String, TeamMember> = HashMap::new();

    for issue in issues {
        let assignee = issue.fields.assignee.as_ref();
        let reporter = issue.fields.reporter.as_ref();
        let assignee_id = assignee.map(|a| a.account_id.as_str());
        let reporter_id = reporter.map(|r| r.account_id.as_str());

        if let Some(assignee) = assignee {
            let member = member_for(&mut members, assignee);
            member.roles.insert(MemberRole::Assignee);
            member.issue_count += 1;
            member.work_seconds += issue.logged_seconds_by(&assignee.account_id);
        }

        if let Some(reporter) = reporter {
            let member = member_for(&mut members, reporter);
            member.roles.insert(MemberRole::Reporter);
            if assignee_id != Some(reporter.account_id.as_str()) {
                member.issue_count += 1;
                member.work_seconds += issue.logged_seconds_by(&reporter.account_id);
            }
        }

        for worklog in issue.worklogs() {
            let author_id = worklog.author.account_id.as_str();
            if Some(author_id) == assignee_id || Some(author_id) == reporter_id {
                continue;
            }

            let member = members
                .entry(worklog.author.account_id.clone())
                .or_insert_with(|| TeamMember::from_author(&worklog.author));
            member.roles.insert(MemberRole::Contributor);
            member.work_seconds += worklog.time_spent_seconds;
        }
    }

    let mut members: Vec<_> = members.into_values().collect();
    members.sort_by(|a, b| {
        b.work_seconds
            .cmp(&a.work_seconds)
            .then(b.issue_count.cmp(&a.issue_count))
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
    members
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectFinancials {
    pub work_seconds: u64,
    pub hourly_rate: f64,
    pub total_cost: f64,
    pub profit: f64,
    pub profit_percentage: f64,
}

impl ProjectFinancials {
    /// `profit = cost - hours * rate`; the percentage is of cost, and 0 when
    /// there is no cost to divide by.
    pub fn compute(total_cost: f64, work_seconds: u64, hourly_rate: f64) -> Self {
        let hours = work_seconds as f64 / SECONDS_PER_HOUR;
        let profit = total_cost - hours * hourly_rate;
        let profit_percentage = if total_cost > 0.0 {
            profit / total_cost * 100.0
        } else {
            0.0
        };

        Self {
            work_seconds,
            hourly_rate,
            total_cost,
            profit,
            profit_percentage,
        }
    }

    pub fn hours(&self) -> f64 {
        self.work_seconds as f64 / SECONDS_PER_HOUR
    }
}

/// A line of the project cost table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub project: Project,
    pub financials: ProjectFinancials,
}

/// Rows in `projects` order. Projects without issues or a recorded cost
/// count as zero.
pub fn project_rows(
    projects: Vec<Project>,
    issues: &HashMap<String, Vec<Issue>>,
    costs: &HashMap<String, f64>,
    hourly_rate: f64,
) -> Vec<ProjectRow> {
    projects
        .into_iter()
        .map(|project| {
            let seconds = issues
                .get(&project.key)
                .map(|i| project_seconds(i))
                .unwrap_or(0);
            let cost = costs.get(&project.key).copied().unwrap_or(0.0);

            ProjectRow {
                financials: ProjectFinancials::compute(cost, seconds, hourly_rate),
                project,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::tests::{issue, jira_user, worklog};
    use rstest::rstest;

    fn project(key: &str) -> Project {
        serde_json::from_value(serde_json::json!({ "id": key, "key": key, "name": key })).unwrap()
    }

    fn member<'a>(members: &'a [TeamMember], id: &str) -> &'a TeamMember {
        members.iter().find(|m| m.account_id == id).unwrap()
    }

    #[test]
    fn sums_worklogs_per_issue_and_project() {
        let issues = vec![
            issue("A-1", None, None, vec![worklog("u1", "Una", 3600), worklog("u2", "Dev", 1800)]),
            issue("A-2", None, None, vec![worklog("u1", "Una", 900)]),
        ];

        assert_eq!(issue_seconds(&issues[0]), 5400);
        assert_eq!(issues[0].logged_seconds_by("u1"), 3600);
        assert_eq!(project_seconds(&issues), 6300);
        assert_eq!(project_seconds(&[]), 0);
    }

    #[test]
    fn assignee_who_reports_is_counted_once() {
        let asha = jira_user("asha", "Asha");
        let issues = vec![issue(
            "A-1",
            Some(asha.clone()),
            Some(asha),
            vec![worklog("asha", "Asha", 7200)],
        )];

        let members = team_members(&issues);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].issue_count, 1);
        assert_eq!(members[0].work_seconds, 7200);
        assert_eq!(
            members[0].roles,
            BTreeSet::from([MemberRole::Assignee, MemberRole::Reporter])
        );
    }

    #[test]
    fn roles_and_contributors_across_issues() {
        let asha = jira_user("asha", "Asha");
        let ravi = jira_user("ravi", "Ravi");
        let issues = vec![
            issue(
                "A-1",
                Some(asha.clone()),
                Some(ravi.clone()),
                vec![
                    worklog("asha", "Asha", 3600),
                    worklog("ravi", "Ravi", 600),
                    worklog("mina", "Mina", 1200),
                    worklog("mina", "Mina", 1200),
                ],
            ),
            issue(
                "A-2",
                Some(ravi),
                Some(asha),
                vec![worklog("asha", "Asha", 300), worklog("ravi", "Ravi", 900)],
            ),
        ];

        let members = team_members(&issues);
        assert_eq!(members.len(), 3);

        let asha = member(&members, "asha");
        assert_eq!(asha.issue_count, 2);
        assert_eq!(asha.work_seconds, 3900);

        let ravi = member(&members, "ravi");
        assert_eq!(ravi.issue_count, 2);
        assert_eq!(ravi.work_seconds, 1500);

        let mina = member(&members, "mina");
        assert_eq!(mina.issue_count, 0);
        assert_eq!(mina.work_seconds, 2400);
        assert_eq!(mina.roles, BTreeSet::from([MemberRole::Contributor]));

        // Every logged second is attributed exactly once.
        let attributed: u64 = members.iter().map(|m| m.work_seconds).sum();
        assert_eq!(attributed, project_seconds(&issues));

        let order: Vec<_> = members.iter().map(|m| m.account_id.as_str()).collect();
        assert_eq!(order, ["asha", "mina", "ravi"]);
    }

    #[test]
    fn ties_break_on_issue_count_then_name() {
        let issues = vec![
            issue("A-1", Some(jira_user("z", "Zed")), None, Vec::new()),
            issue("A-2", Some(jira_user("z", "Zed")), None, Vec::new()),
            issue("A-3", Some(jira_user("b", "Bea")), None, Vec::new()),
            issue("A-4", Some(jira_user("a", "Abe")), None, Vec::new()),
        ];

        let order: Vec<_> = team_members(&issues)
            .into_iter()
            .map(|m| m.display_name)
            .collect();
        assert_eq!(order, ["Zed", "Abe", "Bea"]);
    }

    #[rstest]
    #[case::profitable(100_000.0, 180_000, 200.0, 90_000.0, 90.0)]
    #[case::loss(10_000.0, 360_000, 200.0, -10_000.0, -100.0)]
    #[case::no_cost(0.0, 7_200, 200.0, -400.0, 0.0)]
    #[case::nothing(0.0, 0, 200.0, 0.0, 0.0)]
    fn financials(
        #[case] cost: f64,
        #[case] seconds: u64,
        #[case] rate: f64,
        #[case] profit: f64,
        #[case] percentage: f64,
    ) {
        let financials = ProjectFinancials::compute(cost, seconds, rate);
        assert_eq!(financials.profit, profit);
        assert_eq!(financials.profit_percentage, percentage);
    }

    #[test]
    fn rows_follow_project_order() {
        let issues = HashMap::from([(
            "B".to_string(),
            vec![issue("B-1", None, None, vec![worklog("u", "U", 36_000)])],
        )]);
        let costs = HashMap::from([("B".to_string(), 5_000.0), ("Z".to_string(), 1.0)]);

        let rows = project_rows(vec![project("A"), project("B")], &issues, &costs, 200.0);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].project.key, "A");
        assert_eq!(rows[0].financials.total_cost, 0.0);
        assert_eq!(rows[0].financials.profit_percentage, 0.0);
        assert_eq!(rows[1].financials.hours(), 10.0);
        assert_eq!(rows[1].financials.profit, 3_000.0);
        assert_eq!(rows[1].financials.profit_percentage, 60.0);
    }
}
