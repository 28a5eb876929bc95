//! # flac -> mp3 转码
//!
//! 调用外部解码器与编码器，解码输出直接通过管道送入编码器，
//! 不产生中间文件。默认等价于：
//!
//! ```text
//! flac -s -c -d <source> | lame --silent --preset insane - <dest>
//! ```
//!
//! ## 依赖关系
//! - 被 `handlers/dispatcher.rs` 注册
//! - 外部命令: `flac`, `lame`（可通过命令行替换）

use super::Handler;
use crate::error::{AudioflatError, Result};

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::thread;

const INPUT_PLACEHOLDER: &str = "{input}";
const OUTPUT_PLACEHOLDER: &str = "{output}";

const MAX_REASON_LINES: usize = 5;
const MAX_REASON_CHARS: usize = 512;

/// 外部命令及其参数模板
///
/// 参数中的 `{input}` 与 `{output}` 会被替换为源文件和目标文件路径。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    pub program: String,
    pub args: Vec<String>,
}

impl Tool {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// 静默解码到标准输出
    pub fn flac_decoder() -> Self {
        Self::new("flac", ["-s", "-c", "-d", INPUT_PLACEHOLDER])
    }

    /// 从标准输入读取，以最高质量预设编码
    pub fn lame_encoder() -> Self {
        Self::new("lame", ["--silent", "--preset", "insane", "-", OUTPUT_PLACEHOLDER])
    }

    /// 替换程序名，保留参数模板
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        for arg in &self.args {
            match arg.as_str() {
                INPUT_PLACEHOLDER => cmd.arg(input),
                OUTPUT_PLACEHOLDER => cmd.arg(output),
                other => cmd.arg(other),
            };
        }
        cmd
    }

    /// 用于错误信息的命令行
    pub fn command_line(&self, input: &Path, output: &Path) -> String {
        let mut parts = vec![self.program.clone()];
        for arg in &self.args {
            parts.push(match arg.as_str() {
                INPUT_PLACEHOLDER => input.display().to_string(),
                OUTPUT_PLACEHOLDER => output.display().to_string(),
                other => other.to_string(),
            });
        }
        parts.join(" ")
    }
}

/// 解码后重新编码的处理器
#[derive(Debug, Clone)]
pub struct DecodeReencodeHandler {
    category: String,
    output_extension: String,
    decoder: Tool,
    encoder: Tool,
}

impl DecodeReencodeHandler {
    pub fn new(decoder: Tool, encoder: Tool) -> Self {
        Self {
            category: "flac".to_string(),
            output_extension: "mp3".to_string(),
            decoder,
            encoder,
        }
    }

    fn run_pipeline(&self, source: &Path, destination: &Path) -> Result<()> {
        let mut decoder = self
            .decoder
            .command(source, destination)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(&self.decoder, source, destination, e))?;

        let (Some(decoded), Some(mut decoder_stderr)) =
            (decoder.stdout.take(), decoder.stderr.take())
        else {
            abort(&mut decoder);
            return Err(AudioflatError::ExternalToolFailure {
                command: self.decoder.command_line(source, destination),
                reason: "decoder pipes unavailable".to_string(),
            });
        };

        let encoder = self
            .encoder
            .command(source, destination)
            .stdin(Stdio::from(decoded))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn();

        let encoder = match encoder {
            Ok(child) => child,
            Err(e) => {
                abort(&mut decoder);
                return Err(spawn_error(&self.encoder, source, destination, e));
            }
        };

        // 解码器的 stderr 须与编码器并行读取，否则管道写满后两端互相等待
        let (encoded, decoder_stderr) = thread::scope(|s| {
            let drain = s.spawn(move || {
                let mut buf = Vec::new();
                let _ = decoder_stderr.read_to_end(&mut buf);
                buf
            });
            let encoded = encoder.wait_with_output();
            if encoded.is_err() {
                let _ = decoder.kill();
            }
            (encoded, drain.join().unwrap_or_default())
        });

        let encoded = encoded.map_err(|e| AudioflatError::ExternalToolFailure {
            command: self.encoder.command_line(source, destination),
            reason: e.to_string(),
        })?;

        let status = decoder
            .wait()
            .map_err(|e| AudioflatError::ExternalToolFailure {
                command: self.decoder.command_line(source, destination),
                reason: e.to_string(),
            })?;
        let decoded = Output {
            status,
            stdout: Vec::new(),
            stderr: decoder_stderr,
        };

        check_status(&self.decoder, source, destination, &decoded)?;
        check_status(&self.encoder, source, destination, &encoded)?;
        Ok(())
    }
}

impl Default for DecodeReencodeHandler {
    fn default() -> Self {
        Self::new(Tool::flac_decoder(), Tool::lame_encoder())
    }
}

impl Handler for DecodeReencodeHandler {
    fn category(&self) -> &str {
        &self.category
    }

    fn output_extension(&self) -> &str {
        &self.output_extension
    }

    fn produce(&self, source: &Path, destination: &Path) -> Result<()> {
        let result = self.run_pipeline(source, destination);
        if result.is_err() {
            // 不保留半成品
            let _ = fs::remove_file(destination);
        }
        result
    }
}

/// 找不到程序时报 `CommandNotFound`，其它启动错误（如无执行权限）保留原因
fn spawn_error(tool: &Tool, source: &Path, destination: &Path, err: io::Error) -> AudioflatError {
    if err.kind() == io::ErrorKind::NotFound {
        AudioflatError::CommandNotFound {
            command: tool.program.clone(),
        }
    } else {
        AudioflatError::ExternalToolFailure {
            command: tool.command_line(source, destination),
            reason: err.to_string(),
        }
    }
}

fn abort(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn check_status(tool: &Tool, source: &Path, destination: &Path, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    Err(AudioflatError::ExternalToolFailure {
        command: tool.command_line(source, destination),
        reason: failure_reason(output),
    })
}

/// 日志按行输出：多行 stderr 只保留末尾几行并合并为一行，过长时截取结尾
fn failure_reason(output: &Output) -> String {
    let text = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let stderr = lines[lines.len().saturating_sub(MAX_REASON_LINES)..].join("; ");

    let length = stderr.chars().count();
    let stderr = if length > MAX_REASON_CHARS {
        let tail: String = stderr.chars().skip(length - MAX_REASON_CHARS).collect();
        format!("...{}", tail)
    } else {
        stderr
    };

    if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        stderr
    }
}
