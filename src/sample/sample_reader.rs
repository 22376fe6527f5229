use std::path::Path;
use std::fs::File;
use std::io::BufReader;

use crate::error::{Result, VoteError};
use super::sample_struct::{Sample, read_csv};


/// A struct that reads a CSV file into a [`Sample`]
/// and the raw labels of its target column.
/// # Example
/// The following code is a simple example to read a CSV file.
/// ```no_run
/// use minivotes::prelude::*;
///
/// let filename = "/path/to/csv/file.csv";
/// let (sample, labels) = SampleReader::new()
///     .file(filename)
///     .has_header(true)
///     .target_feature("class")
///     .read()
///     .unwrap();
/// ```
pub struct SampleReader<P, S> {
    file: Option<P>,
    has_header: bool,
    target: Option<S>,
}


impl<P, S> SampleReader<P, S> {
    /// Construct a new instance of [`SampleReader`].
    pub fn new() -> Self {
        Self {
            file: None,
            has_header: false,
            target: None,
        }
    }


    /// Set the flag whether the file has the header row or not.
    /// Default is `false.`
    pub fn has_header(mut self, flag: bool) -> Self {
        self.has_header = flag;
        self
    }
}


impl<P, S> Default for SampleReader<P, S> {
    fn default() -> Self {
        Self::new()
    }
}


impl<P, S> SampleReader<P, S>
    where P: AsRef<Path>
{
    /// Set the file name.
    pub fn file(mut self, file: P) -> Self {
        self.file = Some(file);
        self
    }
}


impl<P, S> SampleReader<P, S>
    where S: AsRef<str>
{
    /// Set the column name that is used for target label.
    /// The labels are returned as they appear in the file.
    pub fn target_feature(mut self, column: S) -> Self {
        self.target = Some(column);
        self
    }
}


impl<P, S> SampleReader<P, S>
    where P: AsRef<Path>,
          S: AsRef<str>
{
    /// Reads the file based on the arguments
    /// and returns the feature matrix and the target labels.
    /// This method consumes `self.`
    pub fn read(self) -> Result<(Sample, Vec<String>)> {
        let file = self.file
            .ok_or_else(|| VoteError::Configuration(
                "the file name is not set, use `SampleReader::file`".into()
            ))?;
        let target = self.target
            .ok_or_else(|| VoteError::Configuration(
                "the target column is not set, \
                use `SampleReader::target_feature`".into()
            ))?;

        let reader = BufReader::new(File::open(file.as_ref())?);
        let (sample, labels) = read_csv(
            reader, self.has_header, Some(target.as_ref())
        )?;
        Ok((sample, labels.unwrap_or_default()))
    }
}
