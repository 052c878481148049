use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    fn width(self) -> usize {
        match self {
            DatePart::Year => 4,
            DatePart::Month | DatePart::Day => 2,
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            DatePart::Year => "[YYYY]",
            DatePart::Month => "[MM]",
            DatePart::Day => "[DD]",
        }
    }
}

/// Digit-by-digit editor for a date that may be left unset.
pub struct DateInputState {
    pub date: Option<NaiveDate>,
    pub editing: bool,
    pub date_part: DatePart,
    pending: String,
}

impl DateInputState {
    pub fn new(date: Option<NaiveDate>) -> Self {
        Self {
            date,
            editing: false,
            date_part: DatePart::Year,
            pending: String::new(),
        }
    }

    /// Entering edit mode on an unset date starts from today.
    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        self.pending.clear();
        if self.editing {
            self.date_part = DatePart::Year;
            if self.date.is_none() {
                self.date = Some(Local::now().date_naive());
            }
        }
    }

    pub fn clear(&mut self) {
        self.date = None;
        self.editing = false;
        self.pending.clear();
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Month,
            DatePart::Month => DatePart::Day,
            DatePart::Day => DatePart::Year,
        };
        self.pending.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Day,
            DatePart::Month => DatePart::Year,
            DatePart::Day => DatePart::Month,
        };
        self.pending.clear();
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.pending.push(c);
                if self.pending.len() == self.date_part.width() {
                    self.commit_pending();
                    self.next_date_part();
                }
            }
            KeyCode::Backspace => {
                self.pending.pop();
            }
            KeyCode::Right => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            _ => {}
        }
    }

    // Out-of-range values are dropped and the previous date is kept.
    fn commit_pending(&mut self) {
        let (Some(current), Ok(value)) = (self.date, self.pending.parse::<u32>()) else {
            self.pending.clear();
            return;
        };

        let (year, month, day) = (current.year(), current.month(), current.day());
        let updated = match self.date_part {
            DatePart::Year if (1900..=2100).contains(&value) => {
                NaiveDate::from_ymd_opt(value as i32, month, day.min(days_in_month(value as i32, month)))
            }
            DatePart::Month if (1..=12).contains(&value) => {
                NaiveDate::from_ymd_opt(year, value, day.min(days_in_month(year, value)))
            }
            DatePart::Day => NaiveDate::from_ymd_opt(year, month, value),
            _ => None,
        };

        if let Some(date) = updated {
            self.date = Some(date);
        }
        self.pending.clear();
    }

    pub fn display(&self) -> String {
        let Some(date) = self.date else {
            return "Not set".to_string();
        };
        if !self.editing {
            return date.format("%Y-%m-%d").to_string();
        }

        let marker = if self.pending.is_empty() {
            self.date_part.placeholder().to_string()
        } else {
            format!("[{}]", self.pending)
        };
        let year = format!("{:04}", date.year());
        let month = format!("{:02}", date.month());
        let day = format!("{:02}", date.day());

        match self.date_part {
            DatePart::Year => format!("{year}{marker}-{month}-{day}"),
            DatePart::Month => format!("{year}-{month}{marker}-{day}"),
            DatePart::Day => format!("{year}-{month}-{day}{marker}"),
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        _ => 30,
    }
}
