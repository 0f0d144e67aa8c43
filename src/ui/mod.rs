/// UI module exports
pub mod clock;
pub mod components;
pub mod options;
pub mod screen_saver;
