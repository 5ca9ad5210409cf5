use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use homehub_plugin_sdk::{
    App, AppFactory, AppHandle, EntryReference, PluginContext, PluginError, Refreshable,
};
use serde::{Deserialize, Serialize};

use crate::localized;
use crate::store::{load_json, save_json};

const DATA_FILE: &str = "whiteboard.json";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f32,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Board {
    strokes: Vec<Stroke>,
}

/// Freehand drawing surface. Strokes in progress live only in memory until
/// [`WhiteboardApp::end_stroke`] commits them.
pub struct WhiteboardApp {
    language: String,
    path: PathBuf,
    board: Board,
    pending: Option<Stroke>,
}

impl WhiteboardApp {
    pub fn open(ctx: &PluginContext) -> Result<Self, PluginError> {
        let path = ctx.data_file(DATA_FILE);
        Ok(Self {
            language: ctx.language.clone(),
            board: load_json(&path)?,
            path,
            pending: None,
        })
    }

    pub fn begin_stroke(&mut self, color: &str, width: f32, at: Point) {
        self.pending = Some(Stroke {
            color: color.to_string(),
            width: width.max(1.0),
            points: vec![at],
        });
    }

    pub fn extend_stroke(&mut self, to: Point) {
        if let Some(stroke) = self.pending.as_mut() {
            stroke.points.push(to);
        }
    }

    pub fn end_stroke(&mut self) -> Result<(), PluginError> {
        let Some(stroke) = self.pending.take() else {
            return Ok(());
        };
        let mut board = self.board.clone();
        board.strokes.push(stroke);
        self.commit(board)
    }

    /// Remove the most recent stroke.
    pub fn undo(&mut self) -> Result<Option<Stroke>, PluginError> {
        let mut board = self.board.clone();
        let removed = board.strokes.pop();
        if removed.is_some() {
            self.commit(board)?;
        }
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<(), PluginError> {
        self.pending = None;
        self.commit(Board::default())
    }

    fn commit(&mut self, board: Board) -> Result<(), PluginError> {
        save_json(&self.path, &board)?;
        self.board = board;
        Ok(())
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.board.strokes
    }
}

impl App for WhiteboardApp {
    fn id(&self) -> &str {
        "whiteboard"
    }

    fn title(&self) -> String {
        localized(&self.language, "Whiteboard", "Whiteboard")
    }

    fn on_language_changed(&mut self, language: &str) {
        self.language = language.to_string();
    }

    fn render(&self) -> String {
        let label = localized(&self.language, "strokes", "Striche");
        format!("{}\n{} {label}", self.title(), self.board.strokes.len())
    }

    fn as_refreshable(&mut self) -> Option<&mut dyn Refreshable> {
        Some(self)
    }
}

impl Refreshable for WhiteboardApp {
    fn refresh(&mut self) -> Result<(), PluginError> {
        self.pending = None;
        self.board = load_json(&self.path)?;
        Ok(())
    }
}

pub struct WhiteboardAppFactory;

impl AppFactory for WhiteboardAppFactory {
    fn entry(&self) -> EntryReference {
        EntryReference::new("whiteboard", "app", "WhiteboardApp")
    }

    fn create(&self, ctx: &PluginContext) -> Result<AppHandle, PluginError> {
        Ok(Rc::new(RefCell::new(WhiteboardApp::open(ctx)?)))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn p(x: f32, y: f32) -> Point {
        Point { x, y }
    }

    #[test]
    fn strokes_commit_on_end_and_survive_reopen() {
        let dir = tempdir().unwrap();
        let ctx = PluginContext::default().with_data_dir(dir.path());
        let mut board = WhiteboardApp::open(&ctx).unwrap();
        board.begin_stroke("#000", 0.2, p(0.0, 0.0));
        board.extend_stroke(p(1.0, 1.0));
        assert!(board.strokes().is_empty());
        board.end_stroke().unwrap();

        let reopened = WhiteboardApp::open(&ctx).unwrap();
        assert_eq!(reopened.strokes().len(), 1);
        assert_eq!(reopened.strokes()[0].points.len(), 2);
        assert_eq!(reopened.strokes()[0].width, 1.0);
    }

    #[test]
    fn undo_and_clear() {
        let dir = tempdir().unwrap();
        let ctx = PluginContext::default().with_data_dir(dir.path());
        let mut board = WhiteboardApp::open(&ctx).unwrap();
        for _ in 0..2 {
            board.begin_stroke("red", 3.0, p(0.0, 0.0));
            board.end_stroke().unwrap();
        }
        assert!(board.undo().unwrap().is_some());
        assert_eq!(board.render(), "Whiteboard\n1 strokes");
        board.clear().unwrap();
        assert!(board.undo().unwrap().is_none());
    }
}
