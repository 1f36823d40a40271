//! Protocol 2.0 包处理器
//!
//! 每个 `*_tx_rx` 方法完成一次完整的请求/应答交换。
//! 读操作返回 `(值, 错误字节)`，写操作返回错误字节；交换失败返回 [`CommError`]。

use crate::{PortHandler, SerialBus, SerialPortHandler};
use dynamixel2::{ReadError, Response, TransferError};
use modelt_protocol::{CommError, PacketError};
use std::io;
use tracing::debug;

/// 单寄存器读写原语
///
/// 控制器只依赖本 trait；具体协议实现与模拟实现均可替换。
pub trait PacketHandler<P: PortHandler> {
    /// 读取 1 字节寄存器，返回 `(值, 错误字节)`
    fn read_1byte_tx_rx(
        &mut self,
        port: &mut P,
        id: u8,
        address: u16,
    ) -> Result<(u8, u8), CommError>;

    /// 读取 2 字节寄存器（小端），返回 `(值, 错误字节)`
    fn read_2byte_tx_rx(
        &mut self,
        port: &mut P,
        id: u8,
        address: u16,
    ) -> Result<(u16, u8), CommError>;

    /// 写入 1 字节寄存器，返回错误字节
    fn write_1byte_tx_rx(
        &mut self,
        port: &mut P,
        id: u8,
        address: u16,
        value: u8,
    ) -> Result<u8, CommError>;

    /// 写入 2 字节寄存器（小端），返回错误字节
    fn write_2byte_tx_rx(
        &mut self,
        port: &mut P,
        id: u8,
        address: u16,
        value: u16,
    ) -> Result<u8, CommError>;

    /// 发送重启指令，返回错误字节
    fn reboot(&mut self, port: &mut P, id: u8) -> Result<u8, CommError>;
}

/// 基于 `dynamixel2` 的包处理器
#[derive(Debug, Default, Clone, Copy)]
pub struct Dynamixel2PacketHandler;

impl Dynamixel2PacketHandler {
    pub fn new() -> Self {
        Self
    }
}

fn open_bus(port: &mut SerialPortHandler) -> Result<&mut SerialBus, CommError> {
    port.bus_mut().ok_or(CommError::PortNotOpen)
}

/// 应答中的 ALERT 标志还原为错误字节
fn alert_byte(alert: bool) -> u8 {
    if alert { PacketError::ALERT } else { 0 }
}

/// 设备错误还原为错误字节，其余失败归入 [`CommError`]
fn classify(err: TransferError) -> Result<u8, CommError> {
    match err {
        TransferError::ReadError(ReadError::MotorError(e)) => Ok(e.raw),
        TransferError::ReadError(ReadError::Io(e)) if e.kind() == io::ErrorKind::TimedOut => {
            Err(CommError::RxTimeout)
        },
        TransferError::ReadError(ReadError::Io(e)) => {
            debug!("status packet read failed: {}", e);
            Err(CommError::RxFail)
        },
        TransferError::ReadError(e) => Err(CommError::RxCorrupt(e.to_string())),
        TransferError::WriteError(e) => {
            debug!("instruction packet write failed: {}", e);
            Err(CommError::TxFail)
        },
    }
}

/// 设备报告错误时读值不可用，按 0 返回
fn read_outcome<T: Default>(
    result: Result<Response<T>, TransferError>,
) -> Result<(T, u8), CommError> {
    match result {
        Ok(response) => Ok((response.data, alert_byte(response.alert))),
        Err(err) => classify(err).map(|error| (T::default(), error)),
    }
}

fn write_outcome(result: Result<Response<()>, TransferError>) -> Result<u8, CommError> {
    match result {
        Ok(response) => Ok(alert_byte(response.alert)),
        Err(err) => classify(err),
    }
}

impl PacketHandler<SerialPortHandler> for Dynamixel2PacketHandler {
    fn read_1byte_tx_rx(
        &mut self,
        port: &mut SerialPortHandler,
        id: u8,
        address: u16,
    ) -> Result<(u8, u8), CommError> {
        read_outcome(open_bus(port)?.read_u8(id, address))
    }

    fn read_2byte_tx_rx(
        &mut self,
        port: &mut SerialPortHandler,
        id: u8,
        address: u16,
    ) -> Result<(u16, u8), CommError> {
        read_outcome(open_bus(port)?.read_u16(id, address))
    }

    fn write_1byte_tx_rx(
        &mut self,
        port: &mut SerialPortHandler,
        id: u8,
        address: u16,
        value: u8,
    ) -> Result<u8, CommError> {
        write_outcome(open_bus(port)?.write_u8(id, address, value))
    }

    fn write_2byte_tx_rx(
        &mut self,
        port: &mut SerialPortHandler,
        id: u8,
        address: u16,
        value: u16,
    ) -> Result<u8, CommError> {
        write_outcome(open_bus(port)?.write_u16(id, address, value))
    }

    fn reboot(&mut self, port: &mut SerialPortHandler, id: u8) -> Result<u8, CommError> {
        write_outcome(open_bus(port)?.reboot(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_port_is_not_open() {
        let mut port = SerialPortHandler::new("/dev/ttyUSB0");
        let mut handler = Dynamixel2PacketHandler::new();

        assert_eq!(
            handler.read_1byte_tx_rx(&mut port, 1, 70),
            Err(CommError::PortNotOpen)
        );
        assert_eq!(
            handler.write_2byte_tx_rx(&mut port, 1, 102, 300),
            Err(CommError::PortNotOpen)
        );
        assert_eq!(handler.reboot(&mut port, 1), Err(CommError::PortNotOpen));
    }

    #[test]
    fn test_alert_byte() {
        assert_eq!(alert_byte(true), PacketError::ALERT);
        assert_eq!(alert_byte(false), 0);
    }

    #[test]
    fn test_classify_io_errors() {
        let timeout = TransferError::ReadError(ReadError::Io(io::ErrorKind::TimedOut.into()));
        assert_eq!(classify(timeout), Err(CommError::RxTimeout));

        let broken = TransferError::ReadError(ReadError::Io(io::ErrorKind::BrokenPipe.into()));
        assert_eq!(classify(broken), Err(CommError::RxFail));
    }
}
