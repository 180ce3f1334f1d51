use formatx::formatx;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::rc::Rc;

pub trait Output: Debug {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write>;
    /// Whether this output can be considered a no-op and therefore that any code that only writes to the output can be skipped.
    fn is_noop(&self) -> bool {
        false
    }
}

#[derive(Debug)]
pub struct FileOutput {
    directory_path: PathBuf,
    file_template: String,
}

impl FileOutput {
    /// `file_template` contains one `{}` placeholder, replaced by the location key.
    pub fn new(directory_path: PathBuf, file_template: String) -> Self {
        Self {
            directory_path,
            file_template,
        }
    }
}

impl Output for FileOutput {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write> {
        let file_name = formatx!(&self.file_template, location_key)
            .map_err(|err| anyhow::anyhow!("Invalid output file template: {err:?}"))?;
        Ok(BufWriter::new(File::create(
            self.directory_path.join(file_name),
        )?))
    }
}

impl Output for &FileOutput {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write> {
        <FileOutput as Output>::writer_for_location_key(self, location_key)
    }
}

/// An output that goes to nowhere/ a "sink"/ /dev/null.
#[derive(Debug, Default)]
pub struct SinkOutput;

impl Output for SinkOutput {
    fn writer_for_location_key(&self, _location_key: &str) -> anyhow::Result<impl Write> {
        Ok(io::sink())
    }

    fn is_noop(&self) -> bool {
        true
    }
}

/// An output held in memory, keyed by location key.
#[derive(Clone, Debug, Default)]
pub struct MemoryOutput {
    files: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryOutput {
    pub fn contents(&self, location_key: &str) -> Option<String> {
        self.files
            .borrow()
            .get(location_key)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

struct MemoryWriter {
    location_key: String,
    files: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.files
            .borrow_mut()
            .entry(self.location_key.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Output for MemoryOutput {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write> {
        self.files
            .borrow_mut()
            .insert(location_key.to_owned(), Vec::new());
        Ok(MemoryWriter {
            location_key: location_key.to_owned(),
            files: self.files.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_collect_written_bytes_in_memory() {
        let output = MemoryOutput::default();
        {
            let mut writer = output.writer_for_location_key("hp-1").unwrap();
            write!(writer, "Timestep,").unwrap();
            writeln!(writer, "Time").unwrap();
        }

        assert_eq!(output.contents("hp-1").unwrap(), "Timestep,Time\n");
        assert_eq!(output.contents("hp-2"), None);
    }

    #[rstest]
    fn should_discard_sink_output() {
        let output = SinkOutput;
        assert!(output.is_noop());
        assert!(output.writer_for_location_key("hp-1").is_ok());
    }

    #[rstest]
    fn should_write_file_named_from_template() {
        let directory = std::env::temp_dir();
        let output = FileOutput::new(
            directory.clone(),
            "heatpump_thermal_output_test__{}.csv".to_owned(),
        );
        {
            let mut writer = output.writer_for_location_key("hp-1").unwrap();
            writer.write_all(b"1,2\n").unwrap();
        }

        let path = directory.join("heatpump_thermal_output_test__hp-1.csv");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1,2\n");
        std::fs::remove_file(path).unwrap();
    }
}
