//! 寄存器传输适配器
//!
//! 持有端口句柄、包处理器与设备 ID，每次调用完成一次寄存器访问（不重试）并对结果分类：
//! 通信失败 -> [`TransportError::Comm`]，设备错误字节非零 -> [`TransportError::Device`]。

use crate::error::TransportError;
use modelt_bus::{PacketHandler, PortHandler};
use modelt_protocol::PacketError;
use tracing::debug;

pub struct RegisterTransport<P, H> {
    port: P,
    handler: H,
    id: u8,
    trace: bool,
}

fn check(error: u8, data: Option<u16>) -> Result<(), TransportError> {
    match PacketError::from_raw(error) {
        None => Ok(()),
        Some(error) => Err(TransportError::Device { error, data }),
    }
}

impl<P: PortHandler, H: PacketHandler<P>> RegisterTransport<P, H> {
    pub fn new(port: P, handler: H, id: u8) -> Self {
        Self {
            port,
            handler,
            id,
            trace: false,
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    /// 开关每次成功操作的 debug 记录
    pub fn set_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    fn trace_op(&self, op: &str, address: u16, value: i32) {
        if self.trace {
            debug!("[ID:{:03}] {}: {} at address {}", self.id, op, value, address);
        }
    }

    /// 读取 1 字节寄存器
    pub fn read_byte(&mut self, address: u16) -> Result<u8, TransportError> {
        let (value, error) = self
            .handler
            .read_1byte_tx_rx(&mut self.port, self.id, address)?;
        check(error, Some(value as u16))?;
        self.trace_op("Read 1 byte", address, value as i32);
        Ok(value)
    }

    /// 读取 2 字节有符号寄存器
    pub fn read_word(&mut self, address: u16) -> Result<i16, TransportError> {
        let (value, error) = self
            .handler
            .read_2byte_tx_rx(&mut self.port, self.id, address)?;
        check(error, Some(value))?;
        let value = value as i16;
        self.trace_op("Read 2 byte", address, value as i32);
        Ok(value)
    }

    /// 写入 1 字节寄存器
    pub fn write_byte(&mut self, address: u16, value: u8) -> Result<(), TransportError> {
        let error = self
            .handler
            .write_1byte_tx_rx(&mut self.port, self.id, address, value)?;
        check(error, None)?;
        self.trace_op("Write 1 byte", address, value as i32);
        Ok(())
    }

    /// 写入 2 字节有符号寄存器
    pub fn write_word(&mut self, address: u16, value: i16) -> Result<(), TransportError> {
        let error = self
            .handler
            .write_2byte_tx_rx(&mut self.port, self.id, address, value as u16)?;
        check(error, None)?;
        self.trace_op("Write 2 byte", address, value as i32);
        Ok(())
    }

    /// 发送重启指令
    pub fn reboot(&mut self) -> Result<(), TransportError> {
        let error = self.handler.reboot(&mut self.port, self.id)?;
        check(error, None)?;
        if self.trace {
            debug!("[ID:{:03}] Reboot", self.id);
        }
        Ok(())
    }
}
