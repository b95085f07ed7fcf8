mod forms;
mod task;
mod user;

pub use forms::{CheckUsernameForm, LoginForm, MessageRequest, NewTaskForm, SignupForm, TaskChanges};
pub use task::{parse_due_date, Task};
pub use user::{first_registered, User, UserMap};
