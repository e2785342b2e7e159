//! Renders wizard forms on a terminal and reads the answers back.

use crate::error::{Error, Result};
use crate::form::{BASE_ERROR, Field, FieldKind, Form, FormInput, reason};
use crate::wizard::input;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

/// Line-based form front-end.
pub struct Prompt<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Prompt<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, out: W) -> Self {
        Self {
            lines: reader.lines(),
            out,
        }
    }

    /// Show a form and collect one answer per field.
    ///
    /// Blank answers leave a field out; anything else is passed on as typed
    /// and left to the form validation.
    pub async fn fill(&mut self, form: &Form) -> Result<FormInput> {
        for (field, reason) in &form.errors {
            let line = if field == BASE_ERROR {
                format!("! {}\n", describe_reason(reason))
            } else {
                format!("! {}: {}\n", field_label(field), describe_reason(reason))
            };
            self.out.write_all(line.as_bytes()).await?;
        }

        let mut answers = FormInput::new();
        for field in &form.fields {
            if let Some(value) = self.ask_field(field).await? {
                answers.insert(field.key.to_string(), value);
            }
        }
        Ok(answers)
    }

    /// Write one line of output.
    pub async fn say(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn ask_field(&mut self, field: &Field) -> Result<Option<Value>> {
        let label = field_label(field.key);
        let answer = match &field.kind {
            FieldKind::Select { options } => {
                for (i, option) in options.iter().enumerate() {
                    self.out
                        .write_all(format!("  {:>3}) {}\n", i + 1, option).as_bytes())
                        .await?;
                }
                let answer = self.ask(label, field.required).await?;
                answer.map(|answer| Value::String(pick_option(options, &answer)))
            }
            FieldKind::Text => self.ask(label, field.required).await?.map(Value::String),
            FieldKind::Boolean => self
                .ask(&format!("{label} [y/N]"), field.required)
                .await?
                .map(|answer| parse_yes_no(&answer)),
        };
        Ok(answer)
    }

    async fn ask(&mut self, question: &str, required: bool) -> Result<Option<String>> {
        let suffix = if required { "" } else { " (optional)" };
        self.out
            .write_all(format!("{question}{suffix}: ").as_bytes())
            .await?;
        self.out.flush().await?;

        let line = self.lines.next_line().await?.ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input closed during setup",
            ))
        })?;

        let answer = line.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }
}

/// A number picks the option at that position; anything else is taken as
/// the label itself.
fn pick_option(options: &[String], answer: &str) -> String {
    answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| options.get(i))
        .cloned()
        .unwrap_or_else(|| answer.to_string())
}

fn parse_yes_no(answer: &str) -> Value {
    match answer.to_lowercase().as_str() {
        "y" | "yes" | "j" | "ja" | "true" => Value::Bool(true),
        "n" | "no" | "nee" | "false" => Value::Bool(false),
        _ => Value::String(answer.to_string()),
    }
}

fn field_label(key: &str) -> &str {
    match key {
        input::CLUB_NAME => "Club",
        input::TEAM_NAME => "Team",
        input::SENSOR_NAME => "Sensor name",
        input::SELECT_COMPETITION => "Track a single competition?",
        input::ADD_ANOTHER => "Add another team?",
        input::COMPETITION_NAME => "Competition",
        other => other,
    }
}

fn describe_reason(key: &str) -> &str {
    match key {
        reason::REQUIRED => "an answer is required",
        reason::INVALID_CHOICE => "not one of the listed options",
        reason::INVALID_INPUT => "answer not understood",
        reason::EMPTY_LIST => "no competitions found for this team; continue without one",
        other => other,
    }
}
