mod user;
mod forms;
mod task;

pub use user::{User, UserDocument};
pub use forms::{
    parse_task_id, required, AddTaskForm, CredentialsForm, EditTaskForm, EditTaskQuery,
    TaskIdForm, UpdateStatusForm,
};
pub use task::{Task, TaskDocument, TaskStatus, TaskSummary};
