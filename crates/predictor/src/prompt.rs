// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Prompt rendering for text-completion backends.

use dataset::Record;
use std::fmt::Write;

/// System instruction sent alongside every prompt.
pub const SYSTEM_PROMPT: &str = "Bạn là một trợ lý AI đa năng với kiến thức rộng về nhiều lĩnh vực.\n\
Kết hợp thông tin tham khảo với kiến thức tổng quát để đưa ra câu trả lời tốt nhất.\n\
Chỉ trả lời duy nhất MỘT chữ cái in hoa (A, B, C, D...). Không giải thích.";

const NO_CONTEXT: &str = "Không có thông tin tham khảo cụ thể.";

/// Lists choices as `A. ...`, `B. ...`, one per line.
pub fn format_choices(choices: &[String]) -> String {
    let mut out = String::new();
    for (i, choice) in choices.iter().take(26).enumerate() {
        let letter = (b'A' + i as u8) as char;
        let _ = writeln!(out, "{letter}. {choice}");
    }
    out.truncate(out.trim_end().len());
    out
}

/// Renders the user prompt for a record.
///
/// Records carrying a reading passage get a `[Đoạn thông tin]` section and
/// an instruction to answer from the passage only.
pub fn render_prompt(record: &Record) -> String {
    let split = record.split_context();
    let choices = format_choices(&record.choices);

    match split.context {
        Some(passage) => format!(
            "[Đoạn thông tin]\n{passage}\n\n[Câu hỏi]\n{}\n\n[Các lựa chọn]\n{choices}\n\n\
             [Yêu cầu]\nĐọc kỹ đoạn thông tin trên và chọn đáp án đúng DỰA HOÀN TOÀN vào nội dung đã cho. \
             Chỉ trả lời 1 chữ cái in hoa.\n",
            split.question,
        ),
        None => format!(
            "[Thông tin tham khảo]\n{NO_CONTEXT}\n\n[Câu hỏi]\n{}\n\n[Các lựa chọn]\n{choices}\n\n\
             [Yêu cầu]\nKết hợp thông tin tham khảo và kiến thức tổng quát để chọn đáp án đúng nhất. \
             Chỉ trả lời 1 chữ cái in hoa.\n",
            split.question,
        ),
    }
}
