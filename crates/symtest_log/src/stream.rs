//! Test-case file streams.

use crate::framing::{FrameReader, FrameWriter};
use crate::record::{decode_record, TestCase};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use symtest_core::CoreResult;

/// Lazy, one-shot reader of test cases
///
/// Each item is the decoding of one complete record; a malformed payload
/// yields an `Err` item and reading continues with the next record.
pub struct TestCaseReader<R> {
    frames: FrameReader<R>,
}

impl<R: Read> TestCaseReader<R> {
    /// Create a reader over a byte stream
    pub fn new(reader: R) -> Self {
        Self {
            frames: FrameReader::new(reader),
        }
    }

    /// Number of complete records consumed so far
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.frames.frames_read()
    }
}

impl TestCaseReader<BufReader<File>> {
    /// Open a test-case file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be opened
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> Iterator for TestCaseReader<R> {
    type Item = CoreResult<TestCase>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.frames.next_frame() {
            Ok(Some(payload)) => Some(decode_record(&payload)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Read every test case from a stream
pub fn read_all<R: Read>(reader: R) -> TestCaseReader<R> {
    TestCaseReader::new(reader)
}

/// Writer producing a test-case file
pub struct TestCaseWriter<W> {
    frames: FrameWriter<W>,
    written: usize,
}

impl<W: Write> TestCaseWriter<W> {
    /// Create a writer over a byte sink
    pub fn new(writer: W) -> Self {
        Self {
            frames: FrameWriter::new(writer),
            written: 0,
        }
    }

    /// Append one test case
    ///
    /// # Errors
    ///
    /// Returns `Io` on write failure
    pub fn write(&mut self, case: &TestCase) -> CoreResult<()> {
        self.frames.write_frame(&case.encode_record())?;
        self.written += 1;
        Ok(())
    }

    /// Number of records written
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the inner writer
    ///
    /// # Errors
    ///
    /// Returns `Io` if flushing fails
    pub fn finish(mut self) -> CoreResult<W> {
        self.frames.flush()?;
        Ok(self.frames.into_inner())
    }
}

impl TestCaseWriter<BufWriter<File>> {
    /// Create (or truncate) a test-case file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be created
    pub fn create(path: impl AsRef<Path>) -> CoreResult<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framing::FrameWriter;
    use symtest_core::{Assignment, Value};

    fn case(i: i32) -> TestCase {
        let mut assignment = Assignment::new();
        assignment.insert("x", i);
        TestCase::new(assignment, format!("{}", i)).with_time_stamp(i as u64)
    }

    fn file_of(cases: &[TestCase]) -> Vec<u8> {
        let mut writer = TestCaseWriter::new(Vec::new());
        for c in cases {
            writer.write(c).unwrap();
        }
        assert_eq!(writer.written(), cases.len());
        writer.finish().unwrap()
    }

    #[test]
    fn test_read_all_yields_every_record() {
        let cases: Vec<TestCase> = (0..3).map(case).collect();
        let bytes = file_of(&cases);
        let decoded: Vec<TestCase> = read_all(bytes.as_slice()).map(Result::unwrap).collect();
        assert_eq!(decoded, cases);
    }

    #[test]
    fn test_read_all_truncated_mid_record() {
        let cases: Vec<TestCase> = (0..3).map(case).collect();
        let mut bytes = file_of(&cases);
        bytes.truncate(bytes.len() - 2);

        let mut reader = read_all(bytes.as_slice());
        let decoded: Vec<TestCase> = reader.by_ref().map(Result::unwrap).collect();
        assert_eq!(decoded, cases[..2].to_vec());
        assert_eq!(reader.records_read(), 2);
    }

    #[test]
    fn test_malformed_payload_does_not_stop_stream() {
        let mut frames = FrameWriter::new(Vec::new());
        frames.write_frame(&case(1).encode_record()).unwrap();
        frames.write_frame(&[0xff, 0xff]).unwrap();
        frames.write_frame(&case(2).encode_record()).unwrap();
        let bytes = frames.into_inner();

        let items: Vec<CoreResult<TestCase>> = read_all(bytes.as_slice()).collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert_eq!(items[1].as_ref().unwrap_err().kind_name(), "DecodingError");
        assert_eq!(
            items[2].as_ref().unwrap().assignment.get("x"),
            Some(&Value::Int(2))
        );
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.bin");

        let mut writer = TestCaseWriter::create(&path).unwrap();
        writer.write(&case(7)).unwrap();
        writer.write(&case(8)).unwrap();
        writer.finish().unwrap();

        let decoded: Vec<TestCase> = TestCaseReader::open(&path)
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(decoded, vec![case(7), case(8)]);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = TestCaseReader::open(dir.path().join("missing.bin"));
        assert_eq!(result.err().map(|e| e.kind_name()), Some("IoError"));
    }
}
