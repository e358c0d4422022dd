pub mod todo_manager;

pub use todo_manager::TodoManager;
