use chrono::{Datelike, FixedOffset, NaiveDate, Utc};

/// Current calendar date in the organisation's offset.
pub fn today(tz: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

pub fn generate_from_period(p: &str) -> Result<Vec<NaiveDate>, String> {
    // YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(p, "%Y-%m-%d") {
        return Ok(vec![d]);
    }

    // YYYY-MM
    if let Ok(dm) = NaiveDate::parse_from_str(&(p.to_string() + "-01"), "%Y-%m-%d") {
        return Ok(all_days_of_month(dm.year(), dm.month()));
    }

    // YYYY
    if p.len() == 4
        && let Ok(year) = p.parse::<i32>()
    {
        return Ok(all_days_of_year(year));
    }

    Err(format!("Invalid period: {}", p))
}

pub fn generate_range(start: &str, end: &str) -> Result<Vec<NaiveDate>, String> {
    let s = generate_from_period(start)?;
    let e = generate_from_period(end)?;

    let (Some(start_date), Some(end_date)) = (s.first().copied(), e.last().copied()) else {
        return Err(format!("Invalid range: {}:{}", start, end));
    };

    if end_date < start_date {
        return Err(format!("Invalid range: {}:{}", start, end));
    }

    Ok(start_date.iter_days().take_while(|d| *d <= end_date).collect())
}

/// Resolve `YYYY`, `YYYY-MM`, `YYYY-MM-DD` or `start:end` to a list of dates.
pub fn resolve_period(p: &str) -> Result<Vec<NaiveDate>, String> {
    if let Some((a, b)) = p.split_once(':') {
        return generate_range(a.trim(), b.trim());
    }
    generate_from_period(p.trim())
}

pub fn all_days_of_month(year: i32, month: u32) -> Vec<NaiveDate> {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => first.iter_days().take_while(|d| d.month() == month).collect(),
        None => Vec::new(),
    }
}

pub fn all_days_of_year(year: i32) -> Vec<NaiveDate> {
    match NaiveDate::from_ymd_opt(year, 1, 1) {
        Some(first) => first.iter_days().take_while(|d| d.year() == year).collect(),
        None => Vec::new(),
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
