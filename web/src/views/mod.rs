mod components;
mod project_dialog;

mod login;
pub use login::Login;

mod leaderboard;
pub use leaderboard::Leaderboard;

mod users;
pub use users::Users;

mod points;
pub use points::Points;

mod resources;
pub use resources::Resources;

mod projects;
pub use projects::Projects;

mod project_management;
pub use project_management::ProjectManagement;

mod change_password;
pub use change_password::ChangePassword;
