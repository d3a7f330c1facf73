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
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

const CONFIG: &str = "tests/test_data/config.toml";
const TODAY: &str = "2024-11-23";

/// Dynamically collects test cases from a given directory.
fn collect_test_cases(subfolder: &str) -> Vec<(String, String)> {
	let dir_path = format!("tests/test_data/{}", subfolder);

	let mut test_cases = vec![];

	if let Ok(entries) = fs::read_dir(&dir_path) {
		let mut inputs = vec![];
		let mut outputs = vec![];

		for entry in entries.flatten() {
			let file_name =
				entry.file_name().into_string().unwrap_or_default();
			if file_name.ends_with("_in.txt") {
				inputs.push(file_name);
			} else if file_name.ends_with("_out.txt") {
				outputs.push(file_name);
			}
		}

		inputs.sort();
		outputs.sort();

		// Pair inputs with corresponding outputs
		for input_file in inputs {
			let output_file = input_file.replace("_in.txt", "_out.txt");
			if outputs.contains(&output_file) {
				test_cases.push((input_file, output_file));
			}
		}
	}

	assert!(!test_cases.is_empty(), "no test cases in {}", dir_path);
	test_cases
}

/// Arguments every run gets ahead of the command: a fixed config and date.
fn common_args<'a>(journal: &'a str) -> Vec<&'a str> {
	vec!["run", "--", "-f", journal, "--config", CONFIG, "--today", TODAY]
}

#[test]
fn test_integration_accounts() {
	let test_cases = collect_test_cases("accounts");
	execute("accounts", test_cases, true, vec![], "accounts", vec![]);
}

#[test]
fn test_integration_guess() {
	let test_cases = collect_test_cases("guess");
	execute(
		"guess",
		test_cases,
		true,
		vec![],
		"guess",
		vec!["--date", "-2", "--desc", "Supermarkt"],
	);
}

#[test]
fn test_integration_balance_entered_postings() {
	let test_cases = collect_test_cases("balance");
	execute(
		"balance",
		test_cases,
		true,
		vec![],
		"guess",
		vec!["--desc", "Supermarket", "-p", "Expenses:Groceries=12.20"],
	);
}

#[test]
fn test_integration_statement_hint() {
	let test_cases = collect_test_cases("statement");
	execute(
		"statement",
		test_cases,
		true,
		vec![
			"--statement",
			"tests/test_data/statement/bank.csv",
			"--row",
			"2",
		],
		"guess",
		vec!["--desc", "Landlord"],
	);
}

#[test]
fn test_integration_should_fail() {
	let test_cases = collect_test_cases("failures");
	execute("failures", test_cases, false, vec![], "accounts", vec![]);
}

#[test]
fn test_integration_statement_row_out_of_range() {
	let output = Command::new("cargo")
		.args(common_args("tests/test_data/statement/household_in.txt"))
		.args([
			"--statement",
			"tests/test_data/statement/bank.csv",
			"--row",
			"3",
			"guess",
		])
		.output()
		.expect("Failed to execute process");

	assert!(!output.status.success());
}

#[test]
fn test_integration_add() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir");
	let journal = dir.path().join("household.journal");
	fs::copy("tests/test_data/household.journal", &journal)
		.expect("Failed to copy journal");
	let journal_str = journal.to_string_lossy().to_string();

	let mut child = Command::new("cargo")
		.args(common_args(&journal_str))
		.arg("add")
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.expect("Failed to execute process");

	// Each transaction: date, description, two postings taking every guess,
	// done, append, then whether to enter another one
	child
		.stdin
		.take()
		.expect("stdin is piped")
		.write_all(
			b"\nSupermarket\n\n\n\n\n\n\ny\n\
			\nRent\n\n\n\n\n\n\n\n",
		)
		.expect("Failed to write answers");

	let output = child.wait_with_output().expect("Failed to wait on process");
	let contents = fs::read_to_string(&journal).unwrap_or_default();

	assert!(
		output.status.success(),
		"add failed: {}",
		String::from_utf8_lossy(&output.stderr)
	);

	let expected = "\tAssets:Checking\n\n\
		2024-11-23 Supermarket\n\
		\tExpenses:Groceries   EUR 41.75\n\
		\tAssets:Checking     EUR -41.75\n\
		\n\
		2024-11-23 Rent\n\
		\tExpenses:Rent     EUR 500\n\
		\tAssets:Checking  EUR -500\n";
	assert!(
		contents.ends_with(expected),
		"unexpected journal contents:\n{}",
		contents
	);
}

fn execute(
	subfolder: &str,
	test_cases: Vec<(String, String)>,
	should_succeed: bool,
	global_args: Vec<&str>,
	cmd: &str,
	args: Vec<&str>,
) {
	for (input_file, expected_output_file) in test_cases {
		println!("running for {}...", input_file);

		let loc = format!("{}/{}/{}", "tests/test_data", subfolder, input_file);

		let all_args = [
			common_args(loc.as_str()),
			global_args.clone(),
			vec![cmd],
			args.clone(),
		]
		.concat();

		let output = Command::new("cargo")
			.args(all_args)
			.output()
			.expect("Failed to execute process");

		if !should_succeed {
			assert!(
				!output.status.success(),
				"{} unexpectedly succeeded!",
				input_file
			);
			continue;
		}

		assert!(
			output.status.success(),
			"{} failed processing: {}",
			input_file,
			String::from_utf8_lossy(&output.stderr)
		);

		let stdout = String::from_utf8_lossy(&output.stdout);

		let expected_output = fs::read_to_string(format!(
			"{}/{}/{}",
			"tests/test_data", subfolder, expected_output_file
		))
		.expect("Failed to read expected output file");

		assert_eq!(
			stdout.trim(),
			expected_output.trim(),
			"Output did not match for {}; expected:\n{}\ngot:\n{}",
			input_file,
			expected_output.trim(),
			stdout.trim()
		);
	}
}
