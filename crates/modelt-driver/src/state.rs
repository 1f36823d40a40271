//! 会话状态

use modelt_protocol::{HardwareErrorCause, HardwareErrorStatus};

/// 控制器持有的会话状态，只由控制器自身的操作修改
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionState {
    /// 端口已成功打开
    pub connected: bool,
    /// 最近一次成功写入的扭矩使能值
    pub torque_enabled: bool,
    /// 每次成功的寄存器操作输出一条 debug 记录
    pub debug_enabled: bool,
}

/// 硬件错误检查结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HardwareStatus {
    Healthy,
    /// 设备报告 ALERT，附带硬件错误状态寄存器值
    Fault(HardwareErrorStatus),
}

impl HardwareStatus {
    pub fn fault_present(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    /// 按优先级取第一个故障原因
    pub fn cause(&self) -> Option<HardwareErrorCause> {
        match self {
            Self::Healthy => None,
            Self::Fault(status) => status.cause(),
        }
    }
}
