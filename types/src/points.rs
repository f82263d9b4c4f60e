//! The points rubric, the award draft behind the points dialog, and the
//! leaderboard ordering.

use serde::{Deserialize, Serialize};

use crate::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    Functional,
    Behavioral,
}

impl Aspect {
    pub const ALL: [Aspect; 2] = [Aspect::Functional, Aspect::Behavioral];

    pub fn id(self) -> &'static str {
        match self {
            Aspect::Functional => "functional",
            Aspect::Behavioral => "behavioral",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Aspect::Functional => "Functional",
            Aspect::Behavioral => "Behavioral",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.id() == id)
    }

    pub fn options(self) -> &'static [AspectOption] {
        match self {
            Aspect::Functional => FUNCTIONAL_OPTIONS,
            Aspect::Behavioral => BEHAVIORAL_OPTIONS,
        }
    }

    pub fn option(self, id: &str) -> Option<&'static AspectOption> {
        self.options().iter().find(|o| o.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectOption {
    pub id: &'static str,
    pub description: &'static str,
}

const fn option(id: &'static str, description: &'static str) -> AspectOption {
    AspectOption { id, description }
}

pub const FUNCTIONAL_OPTIONS: &[AspectOption] = &[
    option("on-time", "A task completed on-time"),
    option("before-time", "A task completed before the time"),
    option("slight-delay", "A task completed with slight delay"),
    option("significant-delay", "A task completed with significant delay"),
    option("extreme-delay", "A task completed with extreme delay"),
    option(
        "exceptional-quality",
        "Task completed with exceptional quality and on or before time",
    ),
    option("poor-quality", "A task completed with poor quality"),
    option("poor-quality-completed", "The poor quality task completed"),
    option("learning-goals", "Learning & development goals are met"),
];

pub const BEHAVIORAL_OPTIONS: &[AspectOption] = &[
    option("follows-policy", "Consistently follows the leaves policy"),
    option(
        "excellent-behavior",
        "Excellent behaviour with Peers, good communication amongst group, active part on all the cultural events",
    ),
    option("minor-friction", "Minor friction in leaves"),
    option("not-adhering", "Regular pattern of not adhering to leaves policy"),
];

/// Body of `POST /points/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsAward {
    pub user_id: String,
    /// May be negative.
    pub points: i64,
    pub reason: String,
    pub aspect: Aspect,
}

/// The points dialog's in-progress selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointsDraft {
    aspect: Option<Aspect>,
    option: Option<&'static str>,
    value: String,
}

impl PointsDraft {
    pub fn aspect(&self) -> Option<Aspect> {
        self.aspect
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Switching aspect drops the chosen option, it belongs to the old list.
    pub fn set_aspect(&mut self, aspect: Option<Aspect>) {
        if self.aspect != aspect {
            self.option = None;
        }
        self.aspect = aspect;
    }

    /// Ignored unless `id` is an option of the current aspect.
    pub fn set_option(&mut self, id: &str) {
        self.option = self.aspect.and_then(|a| a.option(id)).map(|o| o.id);
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn selected(&self) -> Option<&'static AspectOption> {
        self.aspect?.option(self.option?)
    }

    pub fn points(&self) -> Option<i64> {
        self.value.trim().parse().ok()
    }

    pub fn can_submit(&self) -> bool {
        self.selected().is_some() && self.points().is_some()
    }

    /// `None` until the draft can be submitted.
    pub fn award(&self, user_id: &str) -> Option<PointsAward> {
        let aspect = self.aspect?;
        let selected = self.selected()?;

        Some(PointsAward {
            user_id: user_id.to_string(),
            points: self.points()?,
            reason: selected.description.to_string(),
            aspect,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Medal::Gold => "🥇",
            Medal::Silver => "🥈",
            Medal::Bronze => "🥉",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Medal::Gold => "1st Place",
            Medal::Silver => "2nd Place",
            Medal::Bronze => "3rd Place",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    /// 1-based.
    pub rank: usize,
    pub user: User,
}

impl Standing {
    pub fn medal(&self) -> Option<Medal> {
        Medal::for_rank(self.rank)
    }
}

/// Users by points, highest first. Equal scores keep their backend order.
pub fn leaderboard(mut users: Vec<User>) -> Vec<Standing> {
    users.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    users
        .into_iter()
        .enumerate()
        .map(|(i, user)| Standing { rank: i + 1, user })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::tests::user;
    use rstest::rstest;

    #[test]
    fn rubric_sizes() {
        assert_eq!(Aspect::Functional.options().len(), 9);
        assert_eq!(Aspect::Behavioral.options().len(), 4);
        assert_eq!(Aspect::from_id("behavioral"), Some(Aspect::Behavioral));
        assert_eq!(Aspect::from_id("social"), None);
    }

    #[test]
    fn changing_aspect_clears_option() {
        let mut draft = PointsDraft::default();
        draft.set_aspect(Some(Aspect::Functional));
        draft.set_option("on-time");
        assert!(draft.selected().is_some());

        draft.set_aspect(Some(Aspect::Functional));
        assert!(draft.selected().is_some());

        draft.set_aspect(Some(Aspect::Behavioral));
        assert_eq!(draft.selected(), None);
    }

    #[test]
    fn option_must_belong_to_aspect() {
        let mut draft = PointsDraft::default();
        draft.set_option("on-time");
        assert_eq!(draft.selected(), None);

        draft.set_aspect(Some(Aspect::Behavioral));
        draft.set_option("on-time");
        assert_eq!(draft.selected(), None);
    }

    #[rstest]
    #[case::nothing(None, None, "", false)]
    #[case::no_option(Some(Aspect::Functional), None, "5", false)]
    #[case::no_value(Some(Aspect::Functional), Some("on-time"), "", false)]
    #[case::fraction(Some(Aspect::Functional), Some("on-time"), "2.5", false)]
    #[case::text(Some(Aspect::Behavioral), Some("minor-friction"), "five", false)]
    #[case::positive(Some(Aspect::Functional), Some("before-time"), "10", true)]
    #[case::negative(Some(Aspect::Behavioral), Some("not-adhering"), "-3", true)]
    fn submission_needs_every_field(
        #[case] aspect: Option<Aspect>,
        #[case] option: Option<&str>,
        #[case] value: &str,
        #[case] ready: bool,
    ) {
        let mut draft = PointsDraft::default();
        draft.set_aspect(aspect);
        if let Some(option) = option {
            draft.set_option(option);
        }
        draft.set_value(value);

        assert_eq!(draft.can_submit(), ready);
        assert_eq!(draft.award("u1").is_some(), ready);
    }

    #[test]
    fn award_carries_description_as_reason() {
        let mut draft = PointsDraft::default();
        draft.set_aspect(Some(Aspect::Behavioral));
        draft.set_option("minor-friction");
        draft.set_value(" -2 ");

        let award = draft.award("665f1c").unwrap();
        assert_eq!(
            serde_json::to_value(&award).unwrap(),
            serde_json::json!({
                "userId": "665f1c",
                "points": -2,
                "reason": "Minor friction in leaves",
                "aspect": "behavioral",
            })
        );

        draft.reset();
        assert_eq!(draft, PointsDraft::default());
    }

    #[test]
    fn leaderboard_is_stable_and_ranked() {
        let standings = leaderboard(vec![
            user("1", "Asha", 10),
            user("2", "Ravi", 40),
            user("3", "Mina", 10),
            user("4", "Dev", -5),
        ]);

        let names: Vec<_> = standings.iter().map(|s| s.user.name.as_str()).collect();
        assert_eq!(names, ["Ravi", "Asha", "Mina", "Dev"]);
        assert_eq!(standings[0].medal(), Some(Medal::Gold));
        assert_eq!(standings[2].medal(), Some(Medal::Bronze));
        assert_eq!(standings[3].rank, 4);
        assert_eq!(standings[3].medal(), None);
    }
}
