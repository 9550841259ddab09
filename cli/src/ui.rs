// Copyright 2021 The Jujutsu Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Plain stdout/stderr writers plus the handful of prompt helpers `login`
//! needs. No color, no pager: the frontend is deliberately unfancy.

use std::io;
use std::io::Write as _;

/// Thin wrapper over locked stdout/stderr with "Hint:"/"Warning:" helpers.
pub struct Ui {
    quiet: bool,
}

impl Ui {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn stdout(&self) -> io::StdoutLock<'static> {
        io::stdout().lock()
    }

    pub fn stderr(&self) -> io::StderrLock<'static> {
        io::stderr().lock()
    }

    pub fn status(&self, message: &str) {
        if !self.quiet {
            let _ = writeln!(self.stderr(), "{message}");
        }
    }

    pub fn hint(&self, message: &str) {
        let _ = writeln!(self.stderr(), "Hint: {message}");
    }

    pub fn warning(&self, message: &str) {
        let _ = writeln!(self.stderr(), "Warning: {message}");
    }

    pub fn error(&self, message: &str) {
        let _ = writeln!(self.stderr(), "Error: {message}");
    }

    pub fn prompt(&self, label: &str) -> io::Result<String> {
        write!(self.stderr(), "{label}: ")?;
        self.stderr().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    pub fn prompt_password(&self, label: &str) -> io::Result<String> {
        rpassword::prompt_password(format!("{label}: "))
    }
}
