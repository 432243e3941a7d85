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

/// Address at or above which `ldr`/`str`/`mov` references switch from
/// absolute to PC-relative encoding (section 9: canonicalized from two
/// conflicting values found in earlier revisions of the source).
pub const MMIO_THRESHOLD: u32 = 0x2400;

pub const LDR_STR_DIFF_MAX: i64 = (1 << 20) - 1;
pub const LDR_STR_DIFF_MIN: i64 = -(1 << 20);

pub const MOV_DIFF_MAX: i64 = (1 << 15) - 1;
pub const MOV_DIFF_MIN: i64 = -(1 << 15);
