//! 控制表定义
//!
//! Model T 夹爪使用 X 系列 Dynamixel 执行器，这里只列出夹爪控制所需的寄存器。
//! 寄存器表是静态配置数据，运行期不可修改。

// ============================================================================
// 寄存器描述
// ============================================================================

/// 寄存器宽度（字节）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RegisterWidth {
    /// 1 字节
    Byte = 1,
    /// 2 字节
    Word = 2,
}

/// 控制表条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register {
    /// 逻辑名称（用于日志）
    pub name: &'static str,
    /// 寄存器地址
    pub address: u16,
    /// 寄存器宽度；2 字节寄存器按有符号小端值读写
    pub width: RegisterWidth,
}

/// 操作模式 (Operating Mode)
pub const OPERATING_MODE: Register = Register {
    name: "operating_mode",
    address: 11,
    width: RegisterWidth::Byte,
};

/// 电流上限 (Current Limit)
pub const CURRENT_LIMIT: Register = Register {
    name: "current_limit",
    address: 38,
    width: RegisterWidth::Word,
};

/// 扭矩使能 (Torque Enable)
pub const TORQUE_ENABLE: Register = Register {
    name: "torque_enable",
    address: 64,
    width: RegisterWidth::Byte,
};

/// 硬件错误状态 (Hardware Error Status)，位域
pub const HARDWARE_ERROR_STATUS: Register = Register {
    name: "hardware_error_status",
    address: 70,
    width: RegisterWidth::Byte,
};

/// 目标电流 (Goal Current)
pub const GOAL_CURRENT: Register = Register {
    name: "goal_current",
    address: 102,
    width: RegisterWidth::Word,
};

// ============================================================================
// 寄存器取值
// ============================================================================

/// 扭矩关闭
pub const TORQUE_DISABLE: u8 = 0;
/// 扭矩开启
pub const TORQUE_ENABLE_VALUE: u8 = 1;

/// 操作模式
///
/// 夹爪只使用电流控制模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, num_enum::IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum OperatingMode {
    /// 电流控制模式
    Current = 0,
}
