/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::config::config_file::Config;
use anyhow::{anyhow, bail, Error};
use dirs::home_dir;
use std::collections::HashSet;
use std::fs;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct Filesystem {
	/// Set of file paths that have been inspected.
	/// Used to avoid circular includes.
	included_files: HashSet<PathBuf>,
}

impl Filesystem {
	pub fn new() -> Self {
		Self {
			included_files: HashSet::new(),
		}
	}

	pub fn open(&self, file_path: &Path) -> Result<File, Error> {
		File::open(file_path).map_err(|e| {
			anyhow!("failed to open {}: {}", file_path.display(), e)
		})
	}

	pub fn declare_file(&mut self, file_path: &Path) -> Result<(), Error> {
		let key = file_path
			.canonicalize()
			.unwrap_or_else(|_| file_path.to_path_buf());
		if !self.included_files.insert(key) {
			bail!("Circular file includes: {}", file_path.display())
		}
		Ok(())
	}

	/// Appends text to the journal, separated from what is already there by a
	/// blank line.
	pub fn append(&self, file_path: &Path, text: &str) -> Result<(), Error> {
		let needs_separator = fs::read_to_string(file_path)
			.map(|existing| !existing.is_empty() && !existing.ends_with("\n\n"))
			.unwrap_or(false);

		let mut file =
			OpenOptions::new().append(true).create(true).open(file_path)?;
		if needs_separator {
			writeln!(file)?;
		}
		write!(file, "{}", text)?;
		Ok(())
	}

	/// Fetches the config from the given path, or default path if none.
	pub fn get_config(
		&self,
		custom_config_path: Option<&String>,
	) -> Result<Config, Error> {
		let config_path = match &custom_config_path {
			None => {
				let home_dir = home_dir().ok_or_else(|| {
					anyhow!("Unable to determine home directory")
				})?;
				home_dir.join(".config/quickentry/config.toml")
			},
			Some(p) => PathBuf::from(p),
		};

		// create empty config file if it doesn't exist
		if !config_path.exists() && custom_config_path.is_none() {
			if let Some(parent) = config_path.parent() {
				fs::create_dir_all(parent)?;
			}
			File::create(config_path.clone())?;
		}

		let content = fs::read_to_string(&config_path).map_err(|e| {
			anyhow!("failed to read {}: {}", config_path.display(), e)
		})?;
		let config: Config = toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))?;

		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_declare_file() {
		let mut filesystem = Filesystem::new();
		let path = Path::new("path/to/file");
		assert!(filesystem.declare_file(path).is_ok());
		assert!(filesystem.included_files.contains(path));
		assert!(filesystem.declare_file(path).is_err());
	}

	#[test]
	fn test_missing_custom_config_is_an_error() {
		let filesystem = Filesystem::new();
		let path = "/nonexistent/quickentry/config.toml".to_string();
		assert!(filesystem.get_config(Some(&path)).is_err());
	}

	#[test]
	fn test_append_separates_transactions() {
		let mut journal = tempfile::NamedTempFile::new().unwrap();
		write!(journal, "2024-11-15 First\n\tA:B  EUR 1\n").unwrap();

		let filesystem = Filesystem::new();
		filesystem
			.append(journal.path(), "2024-11-16 Second\n\tA:B  EUR 2\n")
			.unwrap();

		let content = fs::read_to_string(journal.path()).unwrap();
		assert_eq!(
			content,
			"2024-11-15 First\n\tA:B  EUR 1\n\n\
			2024-11-16 Second\n\tA:B  EUR 2\n"
		);
	}
}
