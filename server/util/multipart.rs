/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.get(..9).is_some_and(|p| p.eq_ignore_ascii_case("boundary=")))
        .map(|s| s[9..].trim_matches('"').to_owned())
        .filter(|b| !b.is_empty())
}

/// One uploaded file from a multipart body.
#[derive(Debug, PartialEq)]
pub struct FilePart {
    /// As sent by the client; may be empty when no file was chosen.
    pub filename: String,
    pub data: Vec<u8>,
}

/// Finds the file part whose `name` parameter is exactly `field_name`.
///
/// Parts without a `filename` parameter are plain form fields and are skipped.
pub fn find_file_part(body: &[u8], boundary: &str, field_name: &str) -> Option<FilePart> {
    let delimiter = format!("--{}", boundary);

    for part in split_on(body, delimiter.as_bytes()) {
        let sep = b"\r\n\r\n";
        let Some(sep_pos) = find_subsequence(part, sep) else {
            continue;
        };
        let headers = String::from_utf8_lossy(&part[..sep_pos]);
        let Some(disposition) = parse_disposition(&headers) else {
            continue;
        };
        if disposition.name.as_deref() != Some(field_name) {
            continue;
        }
        if let Some(filename) = disposition.filename {
            let raw = &part[sep_pos + sep.len()..];
            let data = raw.strip_suffix(b"\r\n").unwrap_or(raw);
            return Some(FilePart { filename, data: data.to_vec() });
        }
    }
    None
}

#[derive(Debug, Default)]
struct Disposition {
    name: Option<String>,
    filename: Option<String>,
}

/// Parses the `name` and `filename` parameters of a part's
/// `Content-Disposition` header.
fn parse_disposition(headers: &str) -> Option<Disposition> {
    let line = headers.split("\r\n").find(|l| {
        l.get(..20).is_some_and(|p| p.eq_ignore_ascii_case("content-disposition:"))
    })?;

    let mut disposition = Disposition::default();
    for param in line[20..].split(';').skip(1) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').to_owned();
        match key.trim().to_ascii_lowercase().as_str() {
            "name" => disposition.name = Some(value),
            "filename" => disposition.filename = Some(value),
            _ => {}
        }
    }
    Some(disposition)
}
