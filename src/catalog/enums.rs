use std::fmt;
use std::str::FromStr;

use crate::errors::Result;
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Response {
    No = 0,
    Yes = 1,
}

fn respond(_recipient: &str, message: Response) -> &'static str {
    match message {
        Response::No => "Nop",
        Response::Yes => "Yup",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .find(|direction| direction.as_str() == s)
            .ok_or_else(|| format!("unknown direction `{s}`"))
    }
}

/// Bit flags built from constant expressions.
struct FileAccess;

impl FileAccess {
    const NONE: u32 = 0;
    const READ: u32 = 1 << 1;
    const WRITE: u32 = 1 << 2;
    const READ_WRITE: u32 = Self::READ | Self::WRITE;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    const ALL: [LogLevel; 4] = [LogLevel::Error, LogLevel::Warn, LogLevel::Info, LogLevel::Debug];

    fn from_index(index: usize) -> Option<LogLevel> {
        Self::ALL.get(index).copied()
    }
}

pub(super) fn register(registry: &mut Registry) -> Result<()> {
    registry.suite("Enums", |s| {
        s.case("numeric discriminants", |t| {
            t.assert_same(respond("Princess Caroline", Response::Yes), "Yup")?;
            t.assert_same(respond("Princess Caroline", Response::No), "Nop")?;
            t.assert_same(Response::Yes as i32, 1)?;
            Ok(())
        })?;

        s.case("string-valued variants", |t| {
            t.assert_same(Direction::Right.to_string(), "RIGHT")?;
            t.assert_same(Direction::Down.as_str(), "DOWN")?;
            t.assert_truthy("LEFT".parse::<Direction>() == Ok(Direction::Left))?;
            t.assert_throws_matching(|| "SIDEWAYS".parse::<Direction>(), "unknown direction")?;
            Ok(())
        })?;

        s.case("computed and constant members", |t| {
            t.assert_same(FileAccess::NONE, 0)?;
            t.assert_same(FileAccess::READ_WRITE, 6)?;
            t.assert_truthy(FileAccess::READ_WRITE & FileAccess::WRITE != 0)?;
            t.assert_same("123".len(), 3)?;
            Ok(())
        })?;

        s.case("variants as discriminated fields", |t| {
            #[derive(Debug, PartialEq)]
            enum Shape {
                Circle { radius: f64 },
                Square { side_length: f64 },
            }
            let c = Shape::Circle { radius: 100.0 };
            let described = match &c {
                Shape::Circle { radius } => format!("circle of radius {radius}"),
                Shape::Square { side_length } => format!("square of side {side_length}"),
            };
            t.assert_same(described, "circle of radius 100")?;
            t.assert_falsy(c == Shape::Square { side_length: 100.0 })?;
            Ok(())
        })?;

        s.case("reverse mapping", |t| {
            let level = LogLevel::Warn as usize;
            t.assert_same(level, 1)?;
            t.assert_truthy(LogLevel::from_index(level) == Some(LogLevel::Warn))?;
            t.assert_truthy(LogLevel::from_index(99).is_none())?;
            let names: Vec<String> = LogLevel::ALL.iter().map(|l| format!("{l:?}")).collect();
            t.assert_equal(names, vec!["Error", "Warn", "Info", "Debug"])?;
            Ok(())
        })?;

        Ok(())
    })?;
    Ok(())
}
