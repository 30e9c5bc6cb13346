use super::service::CatalogError;

pub const DEFAULT_MIN_DISCIPLINE_HOURS: u16 = 10;
pub const DEFAULT_MAX_DISCIPLINE_HOURS: u16 = 400;
pub const DEFAULT_MAX_SECTION_SEATS: u32 = 200;
pub const DEFAULT_MAX_YEARS_AHEAD: u16 = 5;

const REGISTRATION_NUMBER_DIGITS: usize = 14;

/// Registration bounds applied by the catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentPolicy {
    min_discipline_hours: u16,
    max_discipline_hours: u16,
    max_section_seats: u32,
    max_years_ahead: u16,
}

/// Bounds that cannot form a usable [`EnrollmentPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("discipline hours range {min}..={max} is empty or starts at zero")]
    InvalidHoursRange { min: u16, max: u16 },
    #[error("class sections must allow at least one seat")]
    ZeroSeatLimit,
}

impl EnrollmentPolicy {
    /// Class sections may be scheduled from the current year up to `max_years_ahead` years
    /// later. Zero or inverted hour bounds and a zero seat limit are rejected.
    pub fn new(
        min_discipline_hours: u16,
        max_discipline_hours: u16,
        max_section_seats: u32,
        max_years_ahead: u16,
    ) -> Result<Self, PolicyError> {
        if min_discipline_hours == 0 || min_discipline_hours > max_discipline_hours {
            return Err(PolicyError::InvalidHoursRange {
                min: min_discipline_hours,
                max: max_discipline_hours,
            });
        }
        if max_section_seats == 0 {
            return Err(PolicyError::ZeroSeatLimit);
        }

        Ok(Self {
            min_discipline_hours,
            max_discipline_hours,
            max_section_seats,
            max_years_ahead,
        })
    }

    pub fn min_discipline_hours(&self) -> u16 {
        self.min_discipline_hours
    }

    pub fn max_discipline_hours(&self) -> u16 {
        self.max_discipline_hours
    }

    pub fn max_section_seats(&self) -> u32 {
        self.max_section_seats
    }

    pub fn max_years_ahead(&self) -> u16 {
        self.max_years_ahead
    }

    pub(crate) fn check_hours(&self, hours: u16) -> Result<(), CatalogError> {
        if (self.min_discipline_hours..=self.max_discipline_hours).contains(&hours) {
            Ok(())
        } else {
            Err(CatalogError::validation(
                "hours",
                format!(
                    "must be between {} and {} (got {hours})",
                    self.min_discipline_hours, self.max_discipline_hours
                ),
            ))
        }
    }

    pub(crate) fn check_seats(&self, total_seats: u32) -> Result<(), CatalogError> {
        if (1..=self.max_section_seats).contains(&total_seats) {
            Ok(())
        } else {
            Err(CatalogError::validation(
                "total_seats",
                format!(
                    "must be between 1 and {} (got {total_seats})",
                    self.max_section_seats
                ),
            ))
        }
    }

    pub(crate) fn check_year(&self, year: i32, current_year: i32) -> Result<(), CatalogError> {
        let last_year = current_year.saturating_add(i32::from(self.max_years_ahead));
        if (current_year..=last_year).contains(&year) {
            Ok(())
        } else {
            Err(CatalogError::validation(
                "year",
                format!("must be between {current_year} and {last_year} (got {year})"),
            ))
        }
    }
}

impl Default for EnrollmentPolicy {
    fn default() -> Self {
        Self {
            min_discipline_hours: DEFAULT_MIN_DISCIPLINE_HOURS,
            max_discipline_hours: DEFAULT_MAX_DISCIPLINE_HOURS,
            max_section_seats: DEFAULT_MAX_SECTION_SEATS,
            max_years_ahead: DEFAULT_MAX_YEARS_AHEAD,
        }
    }
}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn required(field: &'static str, value: String) -> Result<String, CatalogError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CatalogError::validation(field, "must not be blank"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Canonical `99.999.999/9999-99` form of an institution registration number, accepted with
/// or without punctuation.
pub(crate) fn registration_number(value: String) -> Result<String, CatalogError> {
    let value = required("registration_number", value)?;
    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '/' | '-' | ' '))
    {
        return Err(CatalogError::validation(
            "registration_number",
            format!("'{value}' may only contain digits and . / - separators"),
        ));
    }

    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != REGISTRATION_NUMBER_DIGITS {
        return Err(CatalogError::validation(
            "registration_number",
            format!(
                "must have {REGISTRATION_NUMBER_DIGITS} digits (got {})",
                digits.len()
            ),
        ));
    }

    Ok(format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    ))
}
