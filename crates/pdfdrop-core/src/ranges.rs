use std::ops::RangeInclusive;

/// Check a page range string like "1-3, 5, 8-10".
///
/// Returns the selected pages as sorted, non-overlapping spans; adjacent
/// and overlapping parts are merged. Pages are 1-based. Spans are never
/// expanded, so the cost depends on the input length only.
pub fn parse_ranges(input: &str) -> Result<Vec<RangeInclusive<u32>>, String> {
    let mut spans = Vec::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start = parse_page(start)?;
            let end = parse_page(end)?;

            if start > end {
                return Err(format!("start {} is after end {}", start, end));
            }

            spans.push(start..=end);
        } else {
            let page = parse_page(part)?;
            spans.push(page..=page);
        }
    }

    if spans.is_empty() {
        return Err("no pages given".to_string());
    }

    spans.sort_by_key(|span| *span.start());

    let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if *span.start() <= last.end().saturating_add(1) => {
                let end = (*last.end()).max(*span.end());
                *last = *last.start()..=end;
            }
            _ => merged.push(span),
        }
    }

    Ok(merged)
}

/// Number of pages covered by spans from [`parse_ranges`]
pub fn page_count(spans: &[RangeInclusive<u32>]) -> u64 {
    spans
        .iter()
        .map(|span| u64::from(*span.end() - *span.start()) + 1)
        .sum()
}

fn parse_page(raw: &str) -> Result<u32, String> {
    let raw = raw.trim();
    let page: u32 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a page number", raw))?;
    if page == 0 {
        return Err("page numbers start at 1".to_string());
    }
    Ok(page)
}
