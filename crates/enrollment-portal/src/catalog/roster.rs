use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Professors and students that exist before any catalog operation runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub professors: Vec<RosterProfessor>,
    #[serde(default)]
    pub students: Vec<RosterStudent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterProfessor {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterStudent {
    pub name: String,
    pub registration_code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to open roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("roster is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("roster entry {index} in {section} has a blank {field}")]
    BlankField {
        section: &'static str,
        index: usize,
        field: &'static str,
    },
}

impl Roster {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RosterError> {
        let roster: Roster = serde_json::from_reader(reader)?;
        roster.validate()?;
        Ok(roster)
    }

    /// Small built-in roster used when no roster file is configured.
    pub fn demo() -> Self {
        let professors = ["Helena Duarte", "Marcos Vieira"]
            .into_iter()
            .map(|name| RosterProfessor {
                name: name.to_string(),
            })
            .collect();
        let students = [
            ("Ana Souza", "2025-0001"),
            ("Bruno Lima", "2025-0002"),
            ("Carla Mendes", "2025-0003"),
        ]
        .into_iter()
        .map(|(name, code)| RosterStudent {
            name: name.to_string(),
            registration_code: code.to_string(),
        })
        .collect();

        Self {
            professors,
            students,
        }
    }

    fn validate(&self) -> Result<(), RosterError> {
        for (index, professor) in self.professors.iter().enumerate() {
            if professor.name.trim().is_empty() {
                return Err(RosterError::BlankField {
                    section: "professors",
                    index,
                    field: "name",
                });
            }
        }
        for (index, student) in self.students.iter().enumerate() {
            let blank = if student.name.trim().is_empty() {
                Some("name")
            } else if student.registration_code.trim().is_empty() {
                Some("registration_code")
            } else {
                None
            };
            if let Some(field) = blank {
                return Err(RosterError::BlankField {
                    section: "students",
                    index,
                    field,
                });
            }
        }
        Ok(())
    }
}
