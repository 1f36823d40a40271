//! # Model T CLI
//!
//! Model T 夹爪的交互式命令行工具。
//!
//! ```bash
//! # 默认参数（Windows: COM5，其他平台: /dev/ttyUSB0，1 Mbps，ID 1，电流上限 400）
//! modelt-cli
//!
//! # 指定端口与电流上限，输出寄存器操作 debug 记录
//! modelt-cli -p /dev/ttyUSB1 -c 350 --debug
//! ```
//!
//! 启动后进入单键会话：
//!
//! - `o`：张开 / `l`：闭合 / `r`：重启
//! - `q` / `a`：增大 / 减小夹持电流（步长 50）
//! - `ESC`：退出（关闭扭矩并断开）
//! - 其他任意键：以当前电流夹持 5 秒

use anyhow::Result;
use clap::Parser;
use modelt_driver::config::{DEFAULT_BAUD_RATE, DEFAULT_CURRENT_LIMIT, DEFAULT_DXL_ID};
use modelt_driver::{DriverError, GripperBuilder};
use std::process::ExitCode;
use tracing::warn;

mod keys;
mod session;
mod validation;

use keys::{KeySource, TerminalKeys};
use session::{DEFAULT_LATCH_DURATION, SessionOptions};

/// Model T CLI - 夹爪命令行工具
#[derive(Parser, Debug)]
#[command(name = "modelt-cli")]
#[command(about = "Interactive controller for the Model T gripper", long_about = None)]
#[command(version)]
struct Cli {
    /// Port name of the Dynamixel device
    #[arg(short, long, default_value = modelt_driver::config::default_port_name())]
    port: String,

    /// Baudrate of the Dynamixel device
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE, value_parser = validation::parse_baud_rate)]
    baudrate: u32,

    /// Dynamixel ID of the gripper (0-252)
    #[arg(
        short = 'i',
        long = "dxl-id",
        alias = "dxl_id",
        default_value_t = DEFAULT_DXL_ID,
        value_parser = validation::parse_dxl_id
    )]
    dxl_id: u8,

    /// Current limit of the gripper
    #[arg(
        short = 'c',
        long = "current-limit",
        alias = "current_limit",
        default_value_t = DEFAULT_CURRENT_LIMIT,
        value_parser = validation::parse_current_limit
    )]
    current_limit: i16,

    /// Print a debug record for every register operation
    #[arg(short, long)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let directive = if debug { "modelt=debug" } else { "modelt=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn wait_for_any_key() {
    println!("Press any key to terminate...");
    if let Err(e) = TerminalKeys::new().read_key() {
        warn!("Failed to read a key: {}", e);
    }
}

/// 连接阶段的致命错误（打开端口/设置波特率失败）
fn is_fatal(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DriverError>().is_some_and(DriverError::is_fatal)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            if is_fatal(&e) {
                wait_for_any_key();
            }
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    println!("Using port: {}", cli.port);
    println!("Using baud rate: {}", cli.baudrate);
    println!("Using dxl id: {}", cli.dxl_id);
    println!("Using current limit: {}", cli.current_limit);

    let mut gripper = GripperBuilder::new()
        .port(cli.port)
        .baud_rate(cli.baudrate)
        .dxl_id(cli.dxl_id)
        .current_limit(cli.current_limit)
        .debug(cli.debug)
        .build()?;

    session::initiate(&mut gripper)?;

    let options = SessionOptions {
        upper_current: cli.current_limit,
        latch_duration: DEFAULT_LATCH_DURATION,
    };
    let result = session::run_session(&mut gripper, &mut TerminalKeys::new(), options);

    session::shutdown(&mut gripper);
    println!("👋 Bye");
    result
}
