use crate::core::normalize::{normalizer_for, Normalizer};
use crate::domain::model::{BatchOutput, ExtraAliases, Platform, Row};
use crate::utils::error::ParseError;
use csv::ReaderBuilder;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes a CSV export for `platform` into normalized products.
pub fn parse_batch(content: &[u8], platform: Platform) -> Result<BatchOutput, ParseError> {
    parse_batch_with(content, &normalizer_for(platform, None))
}

pub fn parse_batch_with_aliases(
    content: &[u8],
    platform: Platform,
    extra: Option<&ExtraAliases>,
) -> Result<BatchOutput, ParseError> {
    parse_batch_with(content, &normalizer_for(platform, extra))
}

/// Drives any [`Normalizer`] over the rows of `content` in file order.
pub fn parse_batch_with<N: Normalizer + ?Sized>(
    content: &[u8],
    normalizer: &N,
) -> Result<BatchOutput, ParseError> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    check_quotes(content)?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers = rdr.headers().map_err(decode_error)?.clone();
    let mut output = BatchOutput::default();

    for (idx, result) in rdr.records().enumerate() {
        let row_num = idx + 1;
        let record = result.map_err(decode_error)?;
        output.rows_read += 1;

        // 欄位數不一致時只取重疊部分
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();

        match normalizer.normalize(&row) {
            Ok(Some(product)) => output.products.push(product),
            Ok(None) => {
                tracing::debug!("Row {}: dropped, missing id or title", row_num);
                output.rows_dropped += 1;
            }
            Err(e) => {
                tracing::error!(
                    "Row {}: {} normalizer failed: {}",
                    row_num,
                    normalizer.platform(),
                    e
                );
                return Err(ParseError::normalize(row_num, e.to_string()));
            }
        }
    }

    tracing::debug!(
        "Parsed {} rows as {}: {} kept, {} dropped",
        output.rows_read,
        normalizer.platform(),
        output.products.len(),
        output.rows_dropped
    );
    Ok(output)
}

fn decode_error(e: csv::Error) -> ParseError {
    tracing::error!("CSV decode failed: {}", e);
    ParseError::decode(e.to_string())
}

/// Rejects input whose quoted field never closes. The csv reader would
/// otherwise swallow the rest of the file into one field.
fn check_quotes(content: &[u8]) -> Result<(), ParseError> {
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut line = 1;
    let mut opened_at = 0;
    let mut i = 0;

    while i < content.len() {
        let b = content[i];
        if in_quotes {
            if b == b'"' {
                if content.get(i + 1) == Some(&b'"') {
                    i += 1;
                } else {
                    in_quotes = false;
                }
            } else if b == b'\n' {
                line += 1;
            }
        } else {
            match b {
                b'"' if at_field_start => {
                    in_quotes = true;
                    opened_at = line;
                }
                b'\n' => line += 1,
                _ => {}
            }
            at_field_start = matches!(b, b',' | b'\n' | b'\r');
            i += 1;
            continue;
        }
        at_field_start = false;
        i += 1;
    }

    if in_quotes {
        let err = ParseError::decode(format!(
            "unterminated quoted field starting on line {}",
            opened_at
        ));
        tracing::error!("{}", err);
        return Err(err);
    }
    Ok(())
}
