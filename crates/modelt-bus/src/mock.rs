//! 模拟端口与模拟设备（无硬件测试）
//!
//! - [`MockPort`]：只记录打开/关闭/波特率状态的模拟串口，可注入打开与波特率失败。
//! - [`MockPacketHandler`]：寄存器级模拟设备，记录每次调用，可注入通信失败与设备错误字节。
//!
//! 两者都是 `Clone`，克隆体共享状态，测试可以在把句柄交给控制器之后继续检查。

use crate::{BusError, PacketHandler, PortHandler};
use modelt_protocol::{
    CommError, HARDWARE_ERROR_STATUS, PacketError, TORQUE_DISABLE, TORQUE_ENABLE,
    bytes_to_i16_le, i16_to_bytes_le,
};
use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// MockPort
// ============================================================================

#[derive(Debug, Default)]
struct MockPortState {
    open: bool,
    baud_rate: u32,
    fail_open: bool,
    fail_baud_rate: bool,
    close_count: usize,
}

/// 模拟串口
#[derive(Debug, Clone)]
pub struct MockPort {
    name: String,
    state: Arc<Mutex<MockPortState>>,
}

impl MockPort {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState {
                baud_rate: crate::DEFAULT_BAUD_RATE,
                ..Default::default()
            })),
        }
    }

    /// 之后的打开全部失败
    pub fn fail_open(&self, fail: bool) {
        lock(&self.state).fail_open = fail;
    }

    /// 之后的波特率设置全部失败
    pub fn fail_baud_rate(&self, fail: bool) {
        lock(&self.state).fail_baud_rate = fail;
    }

    /// 实际关闭（打开 -> 关闭）的次数
    pub fn close_count(&self) -> usize {
        lock(&self.state).close_count
    }
}

impl PortHandler for MockPort {
    fn port_name(&self) -> &str {
        &self.name
    }

    fn open_port(&mut self) -> Result<(), BusError> {
        let mut state = lock(&self.state);
        if state.fail_open {
            return Err(BusError::Open {
                port: self.name.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "mock open failure"),
            });
        }
        state.open = true;
        Ok(())
    }

    fn close_port(&mut self) {
        let mut state = lock(&self.state);
        if state.open {
            state.open = false;
            state.close_count += 1;
        }
    }

    fn is_open(&self) -> bool {
        lock(&self.state).open
    }

    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), BusError> {
        let mut state = lock(&self.state);
        if state.fail_baud_rate {
            return Err(BusError::BaudRate {
                baud_rate,
                source: io::Error::new(io::ErrorKind::InvalidInput, "mock baudrate failure"),
            });
        }
        state.baud_rate = baud_rate;
        Ok(())
    }

    fn baud_rate(&self) -> u32 {
        lock(&self.state).baud_rate
    }
}

// ============================================================================
// MockPacketHandler
// ============================================================================

/// 一次寄存器级调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusCall {
    Read { id: u8, address: u16, length: u16 },
    Write { id: u8, address: u16, data: Vec<u8> },
    Reboot { id: u8 },
}

#[derive(Debug, Default)]
struct MockDeviceState {
    registers: BTreeMap<u16, u8>,
    calls: Vec<BusCall>,
    pending_failures: VecDeque<CommError>,
    comm_failure: Option<CommError>,
    error_byte: u8,
}

impl MockDeviceState {
    fn record(&mut self, call: BusCall) -> Result<(), CommError> {
        self.calls.push(call);
        if let Some(err) = self.pending_failures.pop_front() {
            return Err(err);
        }
        match &self.comm_failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn byte(&self, address: u16) -> u8 {
        self.registers.get(&address).copied().unwrap_or(0)
    }

    fn write(&mut self, address: u16, data: &[u8]) {
        // 设备报告错误时不修改寄存器
        if self.error_byte != 0 {
            return;
        }
        for (offset, byte) in data.iter().enumerate() {
            self.registers.insert(address + offset as u16, *byte);
        }
    }
}

/// 寄存器级模拟设备
#[derive(Debug, Clone, Default)]
pub struct MockPacketHandler {
    state: Arc<Mutex<MockDeviceState>>,
}

impl MockPacketHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有调用记录（按时间顺序）
    pub fn calls(&self) -> Vec<BusCall> {
        lock(&self.state).calls.clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.state).calls.clear();
    }

    /// 所有写调用 `(地址, 数据)`
    pub fn writes(&self) -> Vec<(u16, Vec<u8>)> {
        lock(&self.state)
            .calls
            .iter()
            .filter_map(|call| match call {
                BusCall::Write { address, data, .. } => Some((*address, data.clone())),
                _ => None,
            })
            .collect()
    }

    /// 对某个 2 字节寄存器写入过的值（按时间顺序）
    pub fn word_writes(&self, address: u16) -> Vec<i16> {
        self.writes()
            .into_iter()
            .filter(|(a, data)| *a == address && data.len() == 2)
            .map(|(_, data)| bytes_to_i16_le([data[0], data[1]]))
            .collect()
    }

    /// 对某个 1 字节寄存器写入过的值（按时间顺序）
    pub fn byte_writes(&self, address: u16) -> Vec<u8> {
        self.writes()
            .into_iter()
            .filter(|(a, data)| *a == address && data.len() == 1)
            .map(|(_, data)| data[0])
            .collect()
    }

    pub fn register_byte(&self, address: u16) -> u8 {
        lock(&self.state).byte(address)
    }

    pub fn register_word(&self, address: u16) -> i16 {
        let state = lock(&self.state);
        bytes_to_i16_le([state.byte(address), state.byte(address + 1)])
    }

    pub fn set_register_byte(&self, address: u16, value: u8) {
        lock(&self.state).registers.insert(address, value);
    }

    pub fn set_register_word(&self, address: u16, value: i16) {
        let mut state = lock(&self.state);
        let [lo, hi] = i16_to_bytes_le(value);
        state.registers.insert(address, lo);
        state.registers.insert(address + 1, hi);
    }

    /// 设置状态包错误字节（持续生效，直到重置或重启）
    pub fn set_error_byte(&self, error: u8) {
        lock(&self.state).error_byte = error;
    }

    /// 模拟设备锁存硬件故障：写入硬件错误状态并置 ALERT
    pub fn latch_fault(&self, hardware_error_status: u8) {
        let mut state = lock(&self.state);
        state
            .registers
            .insert(HARDWARE_ERROR_STATUS.address, hardware_error_status);
        state.registers.insert(TORQUE_ENABLE.address, TORQUE_DISABLE);
        state.error_byte = PacketError::ALERT;
    }

    /// 所有调用持续返回通信失败；`None` 恢复
    pub fn set_comm_failure(&self, failure: Option<CommError>) {
        lock(&self.state).comm_failure = failure;
    }

    /// 下一次调用返回通信失败
    pub fn fail_next(&self, failure: CommError) {
        lock(&self.state).pending_failures.push_back(failure);
    }
}

impl<P: PortHandler> PacketHandler<P> for MockPacketHandler {
    fn read_1byte_tx_rx(
        &mut self,
        _port: &mut P,
        id: u8,
        address: u16,
    ) -> Result<(u8, u8), CommError> {
        let mut state = lock(&self.state);
        state.record(BusCall::Read {
            id,
            address,
            length: 1,
        })?;
        Ok((state.byte(address), state.error_byte))
    }

    fn read_2byte_tx_rx(
        &mut self,
        _port: &mut P,
        id: u8,
        address: u16,
    ) -> Result<(u16, u8), CommError> {
        let mut state = lock(&self.state);
        state.record(BusCall::Read {
            id,
            address,
            length: 2,
        })?;
        let value = u16::from_le_bytes([state.byte(address), state.byte(address + 1)]);
        Ok((value, state.error_byte))
    }

    fn write_1byte_tx_rx(
        &mut self,
        _port: &mut P,
        id: u8,
        address: u16,
        value: u8,
    ) -> Result<u8, CommError> {
        let mut state = lock(&self.state);
        state.record(BusCall::Write {
            id,
            address,
            data: vec![value],
        })?;
        state.write(address, &[value]);
        Ok(state.error_byte)
    }

    fn write_2byte_tx_rx(
        &mut self,
        _port: &mut P,
        id: u8,
        address: u16,
        value: u16,
    ) -> Result<u8, CommError> {
        let mut state = lock(&self.state);
        let data = value.to_le_bytes().to_vec();
        state.record(BusCall::Write {
            id,
            address,
            data: data.clone(),
        })?;
        state.write(address, &data);
        Ok(state.error_byte)
    }

    fn reboot(&mut self, _port: &mut P, id: u8) -> Result<u8, CommError> {
        let mut state = lock(&self.state);
        state.record(BusCall::Reboot { id })?;
        // 重启后扭矩关闭，锁存的故障被清除
        state.registers.insert(TORQUE_ENABLE.address, TORQUE_DISABLE);
        state.registers.insert(HARDWARE_ERROR_STATUS.address, 0);
        state.error_byte = 0;
        Ok(0)
    }
}
