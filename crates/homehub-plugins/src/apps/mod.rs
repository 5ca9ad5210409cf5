//! Full-screen apps shown in the hub's content area.

pub mod calendar;
pub mod home_assistant;
pub mod pantry;
pub mod task_board;
pub mod whiteboard;

pub use calendar::CalendarApp;
pub use home_assistant::HomeAssistantApp;
pub use pantry::PantryApp;
pub use task_board::TaskBoardApp;
pub use whiteboard::WhiteboardApp;
