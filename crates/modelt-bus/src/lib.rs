//! # Model T Bus Layer
//!
//! 串口句柄与 Protocol 2.0 包处理层。
//!
//! - [`PortHandler`]：半双工串口句柄（打开/关闭/波特率）
//! - [`PacketHandler`]：基于端口句柄的单寄存器读写原语
//! - [`SerialPortHandler`]：持有 `dynamixel2::Bus` 的串口句柄
//! - [`Dynamixel2PacketHandler`]：通过 `dynamixel2` 完成请求/应答交换
//! - `mock`（feature `mock`）：无硬件的模拟端口与模拟寄存器表

use thiserror::Error;

pub use modelt_protocol::{CommError, PacketError};

pub mod packet_handler;
pub mod serial;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use packet_handler::{Dynamixel2PacketHandler, PacketHandler};
pub use serial::{SerialBus, SerialPortHandler};

/// 默认波特率
pub const DEFAULT_BAUD_RATE: u32 = 57_600;

/// 端口层统一错误类型
#[derive(Error, Debug)]
pub enum BusError {
    #[error("Failed to open port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to change the baudrate to {baud_rate}: {source}")]
    BaudRate {
        baud_rate: u32,
        #[source]
        source: std::io::Error,
    },
}

/// 半双工串口句柄
///
/// 一个句柄同一时刻只服务一个请求/应答交换，由调用方独占（`&mut self`）。
pub trait PortHandler {
    /// 设备路径
    fn port_name(&self) -> &str;

    /// 以当前波特率打开端口
    fn open_port(&mut self) -> Result<(), BusError>;

    /// 关闭端口（未打开时无操作）
    fn close_port(&mut self);

    fn is_open(&self) -> bool;

    /// 设置波特率；端口已打开时立即生效
    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), BusError>;

    fn baud_rate(&self) -> u32;
}
