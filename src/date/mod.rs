// Copyright (c) 2021-2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

pub mod builder;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};

use self::builder::ZipDateTimeBuilder;

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#446
// https://learn.microsoft.com/en-us/windows/win32/api/oleauto/nf-oleauto-dosdatetimetovarianttime

/// The earliest year representable by the MS-DOS format.
pub const MIN_YEAR: i32 = 1980;
/// The latest year representable by the MS-DOS format.
pub const MAX_YEAR: i32 = 2107;

/// A date and time stored as per the MS-DOS representation used by ZIP files.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub struct ZipDateTime {
    pub(crate) date: u16,
    pub(crate) time: u16,
}

impl ZipDateTime {
    /// The earliest representable date & time, 1980-01-01 00:00:00.
    pub const MIN: ZipDateTime = ZipDateTime { date: (1 << 5) | 1, time: 0 };

    /// The latest representable date & time, 2107-12-31 23:59:58.
    pub const MAX: ZipDateTime =
        ZipDateTime { date: (((MAX_YEAR - MIN_YEAR) as u16) << 9) | (12 << 5) | 31, time: (23 << 11) | (59 << 5) | 29 };

    /// Constructs this date & time from its raw packed fields.
    pub fn from_raw(date: u16, time: u16) -> Self {
        Self { date, time }
    }

    /// Returns the raw packed date field.
    pub fn raw_date(&self) -> u16 {
        self.date
    }

    /// Returns the raw packed time field.
    pub fn raw_time(&self) -> u16 {
        self.time
    }

    /// Returns the year of this date & time.
    pub fn year(&self) -> i32 {
        (((self.date & 0xFE00) >> 9) + 1980).into()
    }

    /// Returns the month of this date & time.
    pub fn month(&self) -> u32 {
        ((self.date & 0x1E0) >> 5).into()
    }

    /// Returns the day of this date & time.
    pub fn day(&self) -> u32 {
        (self.date & 0x1F).into()
    }

    /// Returns the hour of this date & time.
    pub fn hour(&self) -> u32 {
        ((self.time & 0xF800) >> 11).into()
    }

    /// Returns the minute of this date & time.
    pub fn minute(&self) -> u32 {
        ((self.time & 0x7E0) >> 5).into()
    }

    /// Returns the second of this date & time.
    ///
    /// Note that MS-DOS has a maximum granularity of two seconds.
    pub fn second(&self) -> u32 {
        ((self.time & 0x1F) << 1).into()
    }

    /// Constructs this date & time from a calendar date & time with no timezone attached.
    ///
    /// Dates before 1980 or after 2107 are clamped to [`ZipDateTime::MIN`] and [`ZipDateTime::MAX`] respectively.
    pub fn from_naive(value: &NaiveDateTime) -> Self {
        if value.year() < MIN_YEAR {
            return Self::MIN;
        }
        if value.year() > MAX_YEAR {
            return Self::MAX;
        }

        ZipDateTimeBuilder::new()
            .year(value.year())
            .month(value.month())
            .day(value.day())
            .hour(value.hour())
            .minute(value.minute())
            .second(value.second())
            .build()
    }

    /// Constructs this date & time from a UNIX timestamp, interpreted as UTC seconds.
    pub fn from_unix(seconds: i64) -> Self {
        match DateTime::<Utc>::from_timestamp(seconds, 0) {
            Some(value) => Self::from_naive(&value.naive_utc()),
            None if seconds < 0 => Self::MIN,
            None => Self::MAX,
        }
    }

    /// Constructs this date & time from chrono's [`DateTime`] representation, using its UTC calendar fields.
    pub fn from_chrono(dt: &DateTime<Utc>) -> Self {
        dt.into()
    }

    /// Constructs chrono's [`NaiveDateTime`] representation of this date & time.
    ///
    /// Returns [`None`] if the packed fields don't describe a valid calendar date (eg. a zeroed date).
    pub fn as_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year(), self.month(), self.day())?.and_hms_opt(
            self.hour(),
            self.minute(),
            self.second(),
        )
    }
}

impl From<ZipDateTimeBuilder> for ZipDateTime {
    fn from(builder: ZipDateTimeBuilder) -> Self {
        builder.0
    }
}

impl From<&NaiveDateTime> for ZipDateTime {
    fn from(value: &NaiveDateTime) -> Self {
        Self::from_naive(value)
    }
}

impl From<&DateTime<Utc>> for ZipDateTime {
    fn from(value: &DateTime<Utc>) -> Self {
        Self::from_naive(&value.naive_utc())
    }
}

impl From<DateTime<Utc>> for ZipDateTime {
    fn from(value: DateTime<Utc>) -> Self {
        (&value).into()
    }
}
