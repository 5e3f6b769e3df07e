use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{MarkovError, MarkovResult};

/// Reads a UTF-8 text file and returns its whole content as the training corpus.
///
/// # Errors
/// - `CorpusUnavailable` if the file cannot be opened or is not valid UTF-8
/// - `EmptyCorpus` if the file was read but holds no character
pub fn read_corpus<P: AsRef<Path>>(filename: P) -> MarkovResult<String> {
	let path = filename.as_ref();
	let contents = fs::read_to_string(path)
		.map_err(|source| MarkovError::corpus_unavailable(path, source))?;

	if contents.is_empty() {
		return Err(MarkovError::EmptyCorpus);
	}

	log::debug!("Read corpus {} ({} bytes)", path.display(), contents.len());
	Ok(contents)
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/input.txt` + `"bin"` → `data/input.bin`
pub fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn output_path_swaps_the_extension() {
		let out = build_output_path("data/ci.txt", "bin").unwrap();
		assert_eq!(out, PathBuf::from("data/ci.bin"));
	}

	#[test]
	fn output_path_without_filename_is_rejected() {
		let err = build_output_path("/", "bin").unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
	}

	#[test]
	fn missing_file_is_corpus_unavailable() {
		let dir = tempfile::tempdir().unwrap();
		let err = read_corpus(dir.path().join("nope.txt")).unwrap_err();
		assert!(matches!(err, MarkovError::CorpusUnavailable { .. }));
	}

	#[test]
	fn empty_file_is_empty_corpus() {
		let file = tempfile::NamedTempFile::new().unwrap();
		let err = read_corpus(file.path()).unwrap_err();
		assert!(matches!(err, MarkovError::EmptyCorpus));
	}

	#[test]
	fn invalid_utf8_is_corpus_unavailable() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(&[0xff, 0xfe, 0xfd]).unwrap();
		let err = read_corpus(file.path()).unwrap_err();
		assert!(matches!(err, MarkovError::CorpusUnavailable { .. }));
	}

	#[test]
	fn reads_multibyte_text_verbatim() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "明月几时有\n把酒问青天").unwrap();
		assert_eq!(read_corpus(file.path()).unwrap(), "明月几时有\n把酒问青天");
	}
}
