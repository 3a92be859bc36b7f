//! Scene file parser
//!
//! This is a minimal TOML parser that handles only the subset used by
//! scene files. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs at the root (`id`, `name`)
//! - `[[macros]]` array-of-tables headers, one per binding
//! - Values as handled by [`super::value`], with arrays and inline tables
//!   allowed to span several lines
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings
//! - Datetime values
//! - Dotted keys
//! - `[section]` headers
//!
//! Problems with a single action item are logged and the item is dropped.
//! Problems with the file structure reject the whole file.

use alloc::string::String;
use alloc::vec::Vec;

use super::value::{parse_value, Value};
use crate::scene::{
    Action, Binding, Color, KeyStep, MouseGesture, Scene, SceneId, MAX_BINDINGS,
};

/// Tone length when a tone item gives no duration
const DEFAULT_TONE_SECONDS: f32 = 0.25;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Invalid value type
    InvalidValue,
    /// Array or inline table never closed
    UnterminatedArray,
    /// Required `name` key absent
    MissingName,
    /// Scene id longer than the id capacity
    IdTooLong,
    /// More `[[macros]]` entries than binding slots
    TooManyBindings,
}

/// A parsed scene file
#[derive(Debug)]
pub struct SceneFile {
    pub scene: Scene,
    /// Action items or key steps that were logged and dropped
    pub skipped: usize,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Macro,
}

/// Binding being assembled from a `[[macros]]` table
#[derive(Default)]
struct BindingDraft {
    color: Color,
    label: String,
    actions: Vec<Action>,
}

/// Parse one scene file
pub fn parse_scene(input: &str) -> Result<SceneFile, ParseError> {
    let mut id: Option<SceneId> = None;
    let mut name: Option<String> = None;
    let mut bindings: heapless::Vec<Binding, MAX_BINDINGS> = heapless::Vec::new();
    let mut current: Option<BindingDraft> = None;
    let mut section = Section::Root;
    let mut skipped = 0;

    for statement in statements(input) {
        let statement = statement?;

        if statement.starts_with('[') {
            save_binding(&mut bindings, &mut current)?;
            section = parse_section_header(&statement)?;
            current = Some(BindingDraft::default());
            continue;
        }

        let (key, value) = parse_key_value(&statement).ok_or(ParseError::InvalidLine)?;
        let value = parse_value(value)?;

        match section {
            Section::Root => match key {
                "id" => {
                    let text = value.as_str().ok_or(ParseError::InvalidValue)?;
                    id = Some(SceneId::try_from(text).map_err(|_| ParseError::IdTooLong)?);
                }
                "name" => {
                    name = Some(String::from(value.as_str().ok_or(ParseError::InvalidValue)?));
                }
                _ => {} // Ignore unknown keys
            },
            Section::Macro => {
                let draft = current.as_mut().ok_or(ParseError::InvalidSection)?;
                match key {
                    "color" => draft.color = parse_color(&value)?,
                    "label" => {
                        draft.label = String::from(value.as_str().ok_or(ParseError::InvalidValue)?);
                    }
                    "actions" => {
                        let Value::Array(items) = value else {
                            return Err(ParseError::InvalidValue);
                        };
                        draft.actions = parse_actions(&items, &mut skipped);
                    }
                    _ => {}
                }
            }
        }
    }

    save_binding(&mut bindings, &mut current)?;

    let name = name.ok_or(ParseError::MissingName)?;
    let mut scene = Scene::new(None, &name);
    scene.id = id;
    scene.bindings = bindings;

    Ok(SceneFile { scene, skipped })
}

/// Split input into logical statements
///
/// Comments and blank lines are dropped. A line that opens more brackets
/// than it closes continues onto the following lines.
fn statements(input: &str) -> impl Iterator<Item = Result<String, ParseError>> + '_ {
    let mut lines = input.lines();
    core::iter::from_fn(move || {
        let mut statement = String::new();
        let mut depth: i32 = 0;

        for line in lines.by_ref() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }
            if !statement.is_empty() {
                statement.push(' ');
            }
            statement.push_str(line);
            depth += bracket_balance(line);

            if depth <= 0 {
                return Some(Ok(statement));
            }
        }

        if statement.is_empty() {
            None
        } else {
            // Ran out of input inside an array or table
            lines = "".lines();
            Some(Err(ParseError::UnterminatedArray))
        }
    })
}

/// Remove a trailing `#` comment that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, ch) in line.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if ch == '\\' => escaped = true,
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch == '#' => return &line[..i],
            None => {}
        }
    }
    line
}

/// Opening minus closing brackets and braces outside strings
fn bracket_balance(line: &str) -> i32 {
    let mut balance = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for ch in line.chars() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if ch == '\\' => escaped = true,
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '[' | '{' => balance += 1,
                ']' | '}' => balance -= 1,
                _ => {}
            },
        }
    }
    balance
}

/// Parse a header like `[[macros]]`
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    let inner = header
        .strip_prefix("[[")
        .and_then(|h| h.strip_suffix("]]"))
        .ok_or(ParseError::InvalidSection)?;

    match inner.trim() {
        "macros" => Ok(Section::Macro),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key.trim_matches('"'), value))
}

/// Append the binding being built, if any
fn save_binding(
    bindings: &mut heapless::Vec<Binding, MAX_BINDINGS>,
    current: &mut Option<BindingDraft>,
) -> Result<(), ParseError> {
    if let Some(draft) = current.take() {
        let binding = Binding::new(draft.color, &draft.label, draft.actions);
        bindings
            .push(binding)
            .map_err(|_| ParseError::TooManyBindings)?;
    }
    Ok(())
}

/// Parse a 24-bit color
fn parse_color(value: &Value) -> Result<Color, ParseError> {
    let raw = value.as_int().ok_or(ParseError::InvalidValue)?;
    if !(0..=0xFF_FFFF).contains(&raw) {
        return Err(ParseError::InvalidValue);
    }
    Ok(Color::new(raw as u32))
}

/// Convert a binding's `actions` array, dropping what cannot be run
fn parse_actions(items: &[Value], skipped: &mut usize) -> Vec<Action> {
    let mut actions = Vec::new();
    for item in items {
        match parse_action(item, skipped) {
            Some(action) => actions.push(action),
            None => *skipped += 1,
        }
    }
    actions
}

/// Parse a single item like { type = "scene", dest = "home" }
fn parse_action(item: &Value, skipped: &mut usize) -> Option<Action> {
    if !matches!(item, Value::Table(_)) {
        // Legacy files list bare key codes and strings with no type tag
        warn!("Untyped action item ignored (legacy format)");
        return None;
    }

    let Some(kind) = item.get("type").and_then(Value::as_str) else {
        warn!("Action item without a type ignored");
        return None;
    };

    let action = match kind {
        "scene" => item
            .get("dest")
            .and_then(Value::as_str)
            .and_then(|dest| SceneId::try_from(dest).ok())
            .map(Action::SwitchScene),
        "press" => {
            let Some(Value::Array(keys)) = item.get("keys") else {
                warn!("Press item without a keys array ignored");
                return None;
            };
            Some(Action::PressKeys(parse_steps(keys, skipped)))
        }
        "consumer" => item
            .get("code")
            .and_then(Value::as_int)
            .and_then(|code| u16::try_from(code).ok())
            .map(Action::Consumer),
        "mouse" => parse_mouse(item).map(Action::Mouse),
        "tone" => parse_tone(item),
        _ => {
            warn!("Unknown action type '{}' ignored", kind);
            return None;
        }
    };

    if action.is_none() {
        warn!("Malformed '{}' item ignored", kind);
    }
    action
}

fn parse_mouse(item: &Value) -> Option<MouseGesture> {
    Some(MouseGesture {
        buttons: int_field(item, "buttons")?,
        x: int_field(item, "x")?,
        y: int_field(item, "y")?,
        wheel: int_field(item, "wheel")?,
    })
}

fn parse_tone(item: &Value) -> Option<Action> {
    let frequency = item.get("frequency").and_then(Value::as_int)?;
    let seconds = match item.get("duration") {
        Some(d) => d.as_float()?,
        None => DEFAULT_TONE_SECONDS,
    };
    Some(Action::Tone {
        frequency: u16::try_from(frequency).ok().filter(|&f| f > 0)?,
        ms: seconds_to_ms(seconds)?,
    })
}

/// Optional integer field of a mouse item, zero when absent
fn int_field<T: TryFrom<i64> + Default>(item: &Value, key: &str) -> Option<T> {
    match item.get(key) {
        None => Some(T::default()),
        Some(v) => T::try_from(v.as_int()?).ok(),
    }
}

/// Convert the mixed `keys` list of a press item
fn parse_steps(keys: &[Value], skipped: &mut usize) -> Vec<KeyStep> {
    let mut steps = Vec::new();
    for key in keys {
        let step = match key {
            Value::Int(code) if *code >= 0 => u8::try_from(*code).ok().map(KeyStep::Down),
            Value::Int(code) => u8::try_from(code.unsigned_abs()).ok().map(KeyStep::Up),
            Value::Float(seconds) => seconds_to_ms(*seconds).map(|ms| KeyStep::Delay { ms }),
            Value::Str(text) => Some(KeyStep::Type(text.clone())),
            _ => None,
        };
        match step {
            Some(step) => steps.push(step),
            None => {
                warn!("Invalid key step ignored");
                *skipped += 1;
            }
        }
    }
    steps
}

/// Whole milliseconds, rounded; negative durations are rejected
fn seconds_to_ms(seconds: f32) -> Option<u32> {
    if seconds < 0.0 || seconds.is_nan() {
        return None;
    }
    Some((seconds * 1000.0 + 0.5) as u32)
}
