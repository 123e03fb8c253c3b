use time::Duration;

/// Parses the ISO-8601 durations Clockify reports for finished entries,
/// e.g. `PT1H30M`, `PT45.5S` or `P1DT2H`.
///
/// Year and month designators are rejected since they have no fixed length.
pub fn parse_iso8601_duration(value: &str) -> Result<Duration, String> {
    let invalid = || format!("Failed to parse duration '{value}'");

    let rest = value.strip_prefix('P').ok_or_else(invalid)?;
    if rest.is_empty() {
        return Err(invalid());
    }
    let (date_part, time_part) = match rest.split_once('T') {
        Some((_, "")) => return Err(invalid()),
        Some((date, time)) => (date, time),
        None => (rest, ""),
    };

    let mut total = Duration::ZERO;
    for (part, designators) in [(date_part, &['W', 'D'][..]), (time_part, &['H', 'M', 'S'][..])] {
        let mut number = String::new();
        for c in part.chars() {
            if c.is_ascii_digit() || c == '.' {
                number.push(c);
                continue;
            }
            if !designators.contains(&c) || number.is_empty() {
                return Err(invalid());
            }
            let amount: f64 = number.parse().map_err(|_| invalid())?;
            let seconds = match c {
                'W' => 604_800.0,
                'D' => 86_400.0,
                'H' => 3_600.0,
                'M' => 60.0,
                _ => 1.0,
            };
            total += Duration::seconds_f64(amount * seconds);
            number.clear();
        }
        if !number.is_empty() {
            return Err(invalid());
        }
    }

    Ok(total)
}
