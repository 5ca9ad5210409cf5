use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use homehub_plugin_sdk::{
    App, AppFactory, AppHandle, EntryReference, PluginContext, PluginError, Refreshable,
};
use serde::{Deserialize, Serialize};

use crate::localized;
use crate::store::{load_json, save_json};

const DATA_FILE: &str = "task_board.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Todo,
    InProgress,
    Done,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Todo, Column::InProgress, Column::Done];

    fn label(self, language: &str) -> String {
        match self {
            Column::Todo => localized(language, "To Do", "Zu erledigen"),
            Column::InProgress => localized(language, "In Progress", "In Arbeit"),
            Column::Done => localized(language, "Done", "Erledigt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub column: Column,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BoardData {
    next_id: u32,
    tasks: Vec<Task>,
}

pub struct TaskBoardApp {
    language: String,
    path: PathBuf,
    data: BoardData,
}

impl TaskBoardApp {
    pub fn open(ctx: &PluginContext) -> Result<Self, PluginError> {
        let path = ctx.data_file(DATA_FILE);
        Ok(Self {
            language: ctx.language.clone(),
            data: load_json(&path)?,
            path,
        })
    }

    pub fn add_task(&mut self, title: impl Into<String>) -> Result<u32, PluginError> {
        let mut data = self.data.clone();
        data.next_id += 1;
        let id = data.next_id;
        data.tasks.push(Task {
            id,
            title: title.into(),
            column: Column::Todo,
        });
        self.commit(data)?;
        Ok(id)
    }

    /// Move a task to another column. Returns `false` for unknown ids.
    pub fn move_task(&mut self, id: u32, column: Column) -> Result<bool, PluginError> {
        let mut data = self.data.clone();
        let Some(task) = data.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(false);
        };
        task.column = column;
        self.commit(data)?;
        Ok(true)
    }

    fn commit(&mut self, data: BoardData) -> Result<(), PluginError> {
        save_json(&self.path, &data)?;
        self.data = data;
        Ok(())
    }

    pub fn tasks_in(&self, column: Column) -> impl Iterator<Item = &Task> {
        self.data.tasks.iter().filter(move |task| task.column == column)
    }
}

impl App for TaskBoardApp {
    fn id(&self) -> &str {
        "task_board"
    }

    fn title(&self) -> String {
        localized(&self.language, "Task Board", "Aufgaben")
    }

    fn on_language_changed(&mut self, language: &str) {
        self.language = language.to_string();
    }

    fn render(&self) -> String {
        let mut out = self.title();
        for column in Column::ALL {
            let titles: Vec<_> = self.tasks_in(column).map(|t| t.title.as_str()).collect();
            out.push_str(&format!(
                "\n{} ({}): {}",
                column.label(&self.language),
                titles.len(),
                titles.join(", ")
            ));
        }
        out
    }

    fn as_refreshable(&mut self) -> Option<&mut dyn Refreshable> {
        Some(self)
    }
}

impl Refreshable for TaskBoardApp {
    fn refresh(&mut self) -> Result<(), PluginError> {
        self.data = load_json(&self.path)?;
        Ok(())
    }
}

pub struct TaskBoardAppFactory;

impl AppFactory for TaskBoardAppFactory {
    fn entry(&self) -> EntryReference {
        EntryReference::new("task_board", "app", "TaskBoardApp")
    }

    fn create(&self, ctx: &PluginContext) -> Result<AppHandle, PluginError> {
        Ok(Rc::new(RefCell::new(TaskBoardApp::open(ctx)?)))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn tasks_move_between_columns() {
        let dir = tempdir().unwrap();
        let ctx = PluginContext::default().with_data_dir(dir.path());
        let mut board = TaskBoardApp::open(&ctx).unwrap();
        let laundry = board.add_task("Laundry").unwrap();
        board.add_task("Taxes").unwrap();

        assert!(board.move_task(laundry, Column::Done).unwrap());
        assert!(!board.move_task(99, Column::Done).unwrap());
        assert_eq!(board.tasks_in(Column::Todo).count(), 1);
        assert_eq!(board.tasks_in(Column::Done).next().unwrap().title, "Laundry");
        assert!(board.render().contains("Done (1): Laundry"));
    }

    #[test]
    fn ids_keep_increasing_after_reopen() {
        let dir = tempdir().unwrap();
        let ctx = PluginContext::default().with_data_dir(dir.path());
        let first = TaskBoardApp::open(&ctx).unwrap().add_task("a").unwrap();
        let second = TaskBoardApp::open(&ctx).unwrap().add_task("b").unwrap();
        assert!(second > first);
    }

    #[test]
    fn failed_save_does_not_add_or_move_tasks() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let ctx = PluginContext::default().with_data_dir(&data_dir);
        let mut board = TaskBoardApp::open(&ctx).unwrap();
        let id = board.add_task("Laundry").unwrap();

        std::fs::remove_dir_all(&data_dir).unwrap();
        std::fs::write(&data_dir, "not a directory").unwrap();

        assert!(board.add_task("Taxes").is_err());
        assert!(board.move_task(id, Column::Done).is_err());
        assert_eq!(board.tasks_in(Column::Todo).count(), 1);
        assert_eq!(board.tasks_in(Column::Done).count(), 0);
    }
}
