//! HTML rendering for the todo pages.
//!
//! Templates are compiled into the binary and parsed once when the
//! [`PageRenderer`] is built. Names end in `.html`, so tera autoescapes
//! every interpolated value.

use serde::Serialize;
use tera::{Context, Tera};
use todo_store::{Todo, MAX_TITLE_CHARS};

const INDEX_TEMPLATE: &str = "index.html";

#[derive(Serialize)]
struct TodoView<'a> {
    id: i64,
    title: &'a str,
    is_done: bool,
    created_at: String,
}

impl<'a> From<&'a Todo> for TodoView<'a> {
    fn from(todo: &'a Todo) -> Self {
        Self {
            id: todo.id,
            title: &todo.title,
            is_done: todo.is_done,
            created_at: todo.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        Ok(Self { tera })
    }

    /// The list page. `query` is the trimmed search text echoed back into the form.
    pub fn render_index(&self, todos: &[Todo], query: &str) -> Result<String, tera::Error> {
        let todos: Vec<TodoView<'_>> = todos.iter().map(TodoView::from).collect();

        let mut context = Context::new();
        context.insert("todos", &todos);
        context.insert("q", query);
        context.insert("max_title_chars", &MAX_TITLE_CHARS);
        self.tera.render(INDEX_TEMPLATE, &context)
    }
}
