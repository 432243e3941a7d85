/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use crate::errors::AssemblyError;
use std::collections::HashMap;

/// Maps a fully qualified label name to its absolute address. Built by
/// Pass A, read by Pass B (section 4.3).
#[derive(Debug, Default)]
pub struct SymbolTable {
    addresses: HashMap<String, u32>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable { addresses: HashMap::new() }
    }

    /// Inserts a freshly assigned label address, rejecting a duplicate
    /// definition within the same qualified namespace.
    pub fn define(&mut self, qualified: String, addr: u32, line: usize) -> Result<(), AssemblyError> {
        if self.addresses.contains_key(&qualified) {
            return Err(AssemblyError::semantic(
                line,
                format!("label {:?} is defined more than once", qualified),
            ));
        }
        self.addresses.insert(qualified, addr);
        Ok(())
    }

    /// Looks up a reference by trying the function-qualified name first,
    /// then falling back to the file-qualified name (section 4.3, Pass B).
    pub fn resolve(&self, include_name: Option<&str>, func_name: Option<&str>, text: &str) -> Option<u32> {
        if let Some(func_name) = func_name {
            let qualified = qualify_function_label(include_name, func_name, text);
            if let Some(addr) = self.addresses.get(&qualified) {
                return Some(*addr);
            }
        }
        let free = qualify_free_label(include_name, text);
        self.addresses.get(&free).copied()
    }
}

/// `<include_name>.<function_name><label>` — either qualifier may be empty.
pub fn qualify_function_label(include_name: Option<&str>, func_name: &str, label: &str) -> String {
    format!("{}.{}{}", include_name.unwrap_or(""), func_name, label)
}

/// `<include_name>.<label>`.
pub fn qualify_free_label(include_name: Option<&str>, label: &str) -> String {
    format!("{}.{}", include_name.unwrap_or(""), label)
}
