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

/// Narrows a lexed `i64` literal to the `i32` the AST stores values as.
pub(super) fn checked_i32(n: i64, line: usize) -> Result<i32, AssemblyError> {
    i32::try_from(n).map_err(|_| AssemblyError::range(line, format!("{} exceeds 32 bits", n)))
}
