//! 驱动层错误类型定义

use modelt_bus::BusError;
use modelt_protocol::{CommError, HardwareErrorStatus, PacketError};
use thiserror::Error;

/// 单次寄存器访问的失败分类
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// 请求/应答交换失败
    #[error("{0}")]
    Comm(#[from] CommError),

    /// 交换成功，但状态包错误字节非零
    ///
    /// `data` 为读操作同时返回的寄存器值（ALERT 时仍然有效）。
    #[error("{error}")]
    Device {
        error: PacketError,
        data: Option<u16>,
    },
}

impl TransportError {
    /// 状态包是否设置了 ALERT 位
    pub fn is_alert(&self) -> bool {
        matches!(self, Self::Device { error, .. } if error.is_alert())
    }
}

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 寄存器访问失败
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// 扭矩开启时不允许修改电流上限
    #[error("Torque is currently enabled. Disable torque before setting current limit.")]
    TorqueEnabled,

    /// 设备锁存了硬件故障
    #[error("Hardware fault: {0}")]
    HardwareFault(HardwareErrorStatus),

    /// 打开端口失败
    #[error("Failed to open the port {port}: {source}")]
    PortOpen {
        port: String,
        #[source]
        source: BusError,
    },

    /// 设置波特率失败
    #[error("Failed to change the baudrate to {baud_rate}: {source}")]
    BaudRate {
        baud_rate: u32,
        #[source]
        source: BusError,
    },

    /// 配置无效
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DriverError {
    /// 是否为致命错误（会话无法继续）
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PortOpen { .. } | Self::BaudRate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_transport_error_display_is_diagnostic() {
        let err = TransportError::Comm(CommError::RxTimeout);
        assert_eq!(err.to_string(), "[TxRxResult] There is no status packet!");

        let err = TransportError::Device {
            error: PacketError::from_raw(0x04).unwrap(),
            data: None,
        };
        assert_eq!(
            err.to_string(),
            "[RxPacketError] The data value is out of range!"
        );
    }

    #[test]
    fn test_transport_error_is_alert() {
        let alert = TransportError::Device {
            error: PacketError::from_raw(0x80).unwrap(),
            data: Some(0x04),
        };
        assert!(alert.is_alert());

        let plain = TransportError::Device {
            error: PacketError::from_raw(0x07).unwrap(),
            data: None,
        };
        assert!(!plain.is_alert());

        let rejected = TransportError::Device {
            error: PacketError::from_raw(0x84).unwrap(),
            data: Some(0x04),
        };
        assert!(!rejected.is_alert());
        assert!(!TransportError::Comm(CommError::TxFail).is_alert());
    }

    #[test]
    fn test_is_fatal() {
        let open = DriverError::PortOpen {
            port: "COM5".to_string(),
            source: BusError::Open {
                port: "COM5".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such device"),
            },
        };
        assert!(open.is_fatal());
        assert!(open.to_string().contains("COM5"));

        let baud = DriverError::BaudRate {
            baud_rate: 1_000_000,
            source: BusError::BaudRate {
                baud_rate: 1_000_000,
                source: io::Error::new(io::ErrorKind::InvalidInput, "unsupported"),
            },
        };
        assert!(baud.is_fatal());

        assert!(!DriverError::TorqueEnabled.is_fatal());
        assert!(!DriverError::HardwareFault(HardwareErrorStatus::new(0x04)).is_fatal());
        assert!(!DriverError::from(TransportError::Comm(CommError::RxTimeout)).is_fatal());
    }

    #[test]
    fn test_hardware_fault_display() {
        let err = DriverError::HardwareFault(HardwareErrorStatus::new(0x20));
        assert_eq!(err.to_string(), "Hardware fault: shutdown due to overload error");
    }
}
