pub mod color;
pub mod file_size;
pub mod text;
pub mod time_ago;
