//! # Reporting Module / 报告模块
//!
//! Console and HTML rendering of the matrix results.
//! 矩阵结果的控制台和 HTML 渲染。

pub mod console;
pub mod html;
