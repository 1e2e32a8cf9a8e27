/// Which of the account's system albums to back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Album {
    Profile,
    Wall,
    Saved,
}

impl Album {
    /// The `album_id` value understood by `photos.get`.
    pub fn as_str(&self) -> &str {
        match self {
            Album::Profile => "profile",
            Album::Wall => "wall",
            Album::Saved => "saved",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter(&self) -> &str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
