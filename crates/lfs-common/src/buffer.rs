//! Output buffers for text-formatted and JSON-formatted log messages.
//!
//! The emission adapters on each field syntax write into these buffers
//! directly so the hot logging path never builds an intermediate
//! per-message string. The out-of-scope log writer owns the buffer and
//! interleaves framework fields with its own.

/// Buffer for a text-formatted log message.
///
/// Fields render as ` fieldName="value"`, each preceded by a single space.
#[derive(Debug, Default)]
pub struct TextLogBuffer {
    buf: String,
}

impl TextLogBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with a preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    /// Append a complete field: ` name="value"`.
    pub fn append_field(&mut self, name: &str, value: &str) {
        self.begin_field(name);
        self.buf.push_str(value);
        self.end_field();
    }

    /// Open a field (` name="`) and expose the underlying string so the
    /// caller can stream the value in without allocating it first. Must be
    /// balanced with [`end_field`](Self::end_field).
    pub fn begin_field(&mut self, name: &str) -> &mut String {
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("=\"");
        &mut self.buf
    }

    /// Close a field opened with [`begin_field`](Self::begin_field).
    pub fn end_field(&mut self) {
        self.buf.push('"');
    }

    /// The buffer contents so far.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consume the buffer, returning the accumulated message.
    pub fn into_string(self) -> String {
        self.buf
    }

    /// Clear the buffer for reuse.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// Buffer for a JSON-formatted log message.
///
/// Fields render as `"fieldName":<value>` with commas managed by the
/// buffer. Value-only appends exist for emission inside JSON arrays.
#[derive(Debug, Default)]
pub struct JsonLogBuffer {
    buf: String,
    needs_comma: bool,
}

impl JsonLogBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a JSON object.
    pub fn begin_object(&mut self) {
        self.separator();
        self.buf.push('{');
        self.needs_comma = false;
    }

    /// Close the current JSON object.
    pub fn end_object(&mut self) {
        self.buf.push('}');
        self.needs_comma = true;
    }

    /// Open a JSON array, optionally named.
    pub fn begin_array(&mut self, name: Option<&str>) {
        self.separator();
        if let Some(name) = name {
            self.append_name(name);
        }
        self.buf.push('[');
        self.needs_comma = false;
    }

    /// Close the current JSON array.
    pub fn end_array(&mut self) {
        self.buf.push(']');
        self.needs_comma = true;
    }

    /// Append `"name":"value"` with the value JSON-escaped.
    pub fn append_string_field(&mut self, name: &str, value: &str) {
        self.separator();
        self.append_name(name);
        write_json_string(&mut self.buf, value);
        self.needs_comma = true;
    }

    /// Append `"name":<raw>` where `raw` is already valid JSON.
    pub fn append_raw_field(&mut self, name: &str, raw_json: &str) {
        self.separator();
        self.append_name(name);
        self.buf.push_str(raw_json);
        self.needs_comma = true;
    }

    /// Append a bare JSON string value (for array elements).
    pub fn append_string_value(&mut self, value: &str) {
        self.separator();
        write_json_string(&mut self.buf, value);
        self.needs_comma = true;
    }

    /// Append a bare raw JSON value (for array elements).
    pub fn append_raw_value(&mut self, raw_json: &str) {
        self.separator();
        self.buf.push_str(raw_json);
        self.needs_comma = true;
    }

    /// The buffer contents so far.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consume the buffer, returning the accumulated message.
    pub fn into_string(self) -> String {
        self.buf
    }

    /// Clear the buffer for reuse.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.needs_comma = false;
    }

    fn separator(&mut self) {
        if self.needs_comma {
            self.buf.push(',');
        }
    }

    fn append_name(&mut self, name: &str) {
        write_json_string(&mut self.buf, name);
        self.buf.push(':');
    }
}

/// Write a JSON string literal, escaping per RFC 8259.
fn write_json_string(buf: &mut String, s: &str) {
    use std::fmt::Write;

    buf.push('"');
    for c in s.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(buf, "\\u{:04x}", c as u32);
            }
            c => buf.push(c),
        }
    }
    buf.push('"');
}
