//! # Model T Protocol
//!
//! Model T 夹爪的 Dynamixel Protocol 2.0 协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `control_table`: 寄存器地址、宽度与操作模式
//! - `hardware_error`: 硬件错误状态寄存器解析（按优先级查表）
//! - `status`: 状态包错误字节与通信结果分类
//!
//! 包编解码由 `dynamixel2` 完成，本 crate 只描述寄存器与结果语义。
//!
//! ## 字节序
//!
//! Protocol 2.0 的多字节寄存器值均为小端字节序。

pub mod control_table;
pub mod hardware_error;
pub mod status;

// 重新导出常用类型
pub use control_table::*;
pub use hardware_error::{HARDWARE_ERROR_PRIORITY, HardwareErrorCause, HardwareErrorStatus};
pub use status::{CommError, PacketError, PacketErrorKind};

/// 可寻址的最大设备 ID（0xFD-0xFF 为保留/广播）
pub const MAX_ID: u8 = 0xFC;

/// 小端字节序转 i16
pub fn bytes_to_i16_le(bytes: [u8; 2]) -> i16 {
    i16::from_le_bytes(bytes)
}

/// i16 转小端字节序
pub fn i16_to_bytes_le(value: i16) -> [u8; 2] {
    value.to_le_bytes()
}
