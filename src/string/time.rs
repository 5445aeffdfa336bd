//! Checking the syntax of time values.
//!
//! This is a private module. UTCTime and GeneralizedTime values are kept as
//! text, the functions here only make sure that text is a valid time.

/// Checks a UTCTime value.
///
/// The value has the form `YYMMDDHHMM[SS](Z|±hhmm)`. Two-digit years
/// from 50 on are taken to be in the 20th century. If `strict` is set, the
/// seconds and the `Z` suffix are required.
pub fn check_utc_time(s: &str, strict: bool) -> Result<(), &'static str> {
    let mut cur = Cursor(s.as_bytes());
    let year = cur.number(2).ok_or("invalid year")?;
    cur.date(if year < 50 { 2000 + year } else { 1900 + year })?;
    cur.field(2, 0, 23).ok_or("invalid hour")?;
    cur.field(2, 0, 59).ok_or("invalid minute")?;
    if cur.next_is_digit() {
        cur.field(2, 0, 59).ok_or("invalid second")?;
    }
    else if strict {
        return Err("missing seconds")
    }
    cur.zone(strict, false)
}

/// Checks a GeneralizedTime value.
///
/// The value has the form `YYYYMMDDHH[MM[SS[.f]]][Z|±hhmm]` where a
/// missing zone means local time. If `strict` is set, minutes, seconds and
/// the `Z` suffix are required and a fraction must not end in zero.
pub fn check_generalized_time(
    s: &str, strict: bool
) -> Result<(), &'static str> {
    let mut cur = Cursor(s.as_bytes());
    let year = cur.number(4).ok_or("invalid year")?;
    cur.date(year)?;
    cur.field(2, 0, 23).ok_or("invalid hour")?;
    let mut seconds = false;
    if cur.next_is_digit() {
        cur.field(2, 0, 59).ok_or("invalid minute")?;
        if cur.next_is_digit() {
            cur.field(2, 0, 59).ok_or("invalid second")?;
            seconds = true;
        }
    }
    if strict && !seconds {
        return Err("missing minutes or seconds")
    }
    if cur.take(b'.') {
        match cur.digits().last() {
            None => return Err("empty fraction"),
            Some(b'0') if strict => return Err("trailing zero in fraction"),
            _ => { }
        }
    }
    cur.zone(strict, !strict)
}


//------------ Cursor --------------------------------------------------------

struct Cursor<'a>(&'a [u8]);

impl<'a> Cursor<'a> {
    fn number(&mut self, len: usize) -> Option<u32> {
        let digits = self.0.get(..len)?;
        if !digits.iter().all(u8::is_ascii_digit) {
            return None
        }
        self.0 = &self.0[len..];
        Some(digits.iter().fold(0, |acc, &ch| acc * 10 + u32::from(ch - b'0')))
    }

    fn field(&mut self, len: usize, min: u32, max: u32) -> Option<u32> {
        self.number(len).filter(|value| (min..=max).contains(value))
    }

    fn date(&mut self, year: u32) -> Result<(), &'static str> {
        let month = self.field(2, 1, 12).ok_or("invalid month")?;
        self.field(2, 1, days_in_month(year, month)).ok_or("invalid day")?;
        Ok(())
    }

    fn next_is_digit(&self) -> bool {
        self.0.first().is_some_and(u8::is_ascii_digit)
    }

    fn take(&mut self, ch: u8) -> bool {
        if self.0.first() == Some(&ch) {
            self.0 = &self.0[1..];
            true
        }
        else {
            false
        }
    }

    fn digits(&mut self) -> &'a [u8] {
        let len = self.0.iter().take_while(|ch| ch.is_ascii_digit()).count();
        let (head, tail) = self.0.split_at(len);
        self.0 = tail;
        head
    }

    /// Takes the time zone which must end the value.
    fn zone(
        &mut self, strict: bool, local: bool
    ) -> Result<(), &'static str> {
        match self.0.first().copied() {
            Some(b'Z') => self.0 = &self.0[1..],
            Some(b'+' | b'-') if !strict => {
                self.0 = &self.0[1..];
                self.field(2, 0, 23).ok_or("invalid offset hours")?;
                self.field(2, 0, 59).ok_or("invalid offset minutes")?;
            }
            None if local => return Ok(()),
            _ => return Err("invalid time zone"),
        }
        if self.0.is_empty() {
            Ok(())
        }
        else {
            Err("trailing characters")
        }
    }
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}


//============ Tests =========================================================
