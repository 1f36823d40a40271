//! 夹爪控制器集成测试（模拟总线，无硬件）

use modelt_bus::PortHandler;
use modelt_bus::mock::{BusCall, MockPacketHandler, MockPort};
use modelt_driver::{DriverError, Gripper, GripperBuilder, HardwareStatus, TransportError};
use modelt_protocol::{
    CURRENT_LIMIT, CommError, GOAL_CURRENT, HARDWARE_ERROR_STATUS, HardwareErrorCause,
    OPERATING_MODE, TORQUE_ENABLE,
};
use proptest::prelude::*;
use std::time::{Duration, Instant};

type MockGripper = Gripper<MockPort, MockPacketHandler>;

fn setup() -> (MockGripper, MockPort, MockPacketHandler) {
    let port = MockPort::new("mock0");
    let handler = MockPacketHandler::new();
    let gripper = GripperBuilder::new()
        .port("mock0")
        .open_hold(Duration::from_millis(5))
        .reboot_settle(Duration::from_millis(5))
        .build_with(port.clone(), handler.clone())
        .unwrap();
    (gripper, port, handler)
}

// ============================================================================
// 连接
// ============================================================================

#[test]
fn test_connect_opens_port_and_sets_baud_rate() {
    let (mut gripper, port, _) = setup();
    gripper.connect().unwrap();
    assert!(gripper.is_connected());
    assert!(port.is_open());
}

#[test]
fn test_connect_open_failure_is_fatal() {
    let (mut gripper, port, _) = setup();
    port.fail_open(true);
    let err = gripper.connect().unwrap_err();
    assert!(matches!(err, DriverError::PortOpen { .. }));
    assert!(err.is_fatal());
    assert!(!gripper.is_connected());
}

#[test]
fn test_connect_baud_rate_failure_is_fatal_and_closes_port() {
    let (mut gripper, port, _) = setup();
    port.fail_baud_rate(true);
    let err = gripper.connect().unwrap_err();
    assert!(matches!(err, DriverError::BaudRate { baud_rate: 1_000_000, .. }));
    assert!(err.is_fatal());
    assert!(!gripper.is_connected());
    assert!(!port.is_open());
}

// ============================================================================
// 配置
// ============================================================================

#[test]
fn test_set_defaults_writes_limit_then_mode() {
    let (mut gripper, _, handler) = setup();
    gripper.set_defaults().unwrap();

    assert_eq!(
        handler.writes(),
        vec![
            (CURRENT_LIMIT.address, 400i16.to_le_bytes().to_vec()),
            (OPERATING_MODE.address, vec![0]),
        ]
    );
}

#[test]
fn test_set_defaults_stops_after_limit_failure() {
    let (mut gripper, _, handler) = setup();
    handler.fail_next(CommError::RxTimeout);

    let err = gripper.set_defaults().unwrap_err();
    assert!(matches!(
        err,
        DriverError::Transport(TransportError::Comm(CommError::RxTimeout))
    ));
    assert!(handler.byte_writes(OPERATING_MODE.address).is_empty());
}

#[test]
fn test_set_defaults_rejected_while_torque_on() {
    let (mut gripper, _, handler) = setup();
    gripper.torque_on().unwrap();
    handler.clear_calls();

    assert!(matches!(
        gripper.set_defaults(),
        Err(DriverError::TorqueEnabled)
    ));
    assert!(handler.calls().is_empty());
}

#[test]
fn test_current_limit_extremes_read_back() {
    let (mut gripper, _, _) = setup();
    for value in [0, i16::MAX, -200] {
        gripper.set_current_limit(value).unwrap();
        assert_eq!(gripper.current_limit().unwrap(), value);
    }
}

proptest! {
    #[test]
    fn current_limit_reads_back_what_was_written(value in any::<i16>()) {
        let (mut gripper, _, _) = setup();
        gripper.set_current_limit(value).unwrap();
        prop_assert_eq!(gripper.current_limit().unwrap(), value);
    }
}

// ============================================================================
// 故障
// ============================================================================

#[test]
fn test_check_hw_error_overheating() {
    let (mut gripper, _, handler) = setup();
    handler.latch_fault(0b0000_0100);

    let status = gripper.check_hw_error().unwrap();
    assert_eq!(status.cause(), Some(HardwareErrorCause::Overheating));
    assert_eq!(gripper.check_hw_error_flags(), (true, true));
}

#[test]
fn test_check_hw_error_priority() {
    let (mut gripper, _, handler) = setup();
    // 过载 + 编码器：编码器优先
    handler.latch_fault(0b0010_1000);
    assert_eq!(
        gripper.check_hw_error().unwrap().cause(),
        Some(HardwareErrorCause::MotorEncoder)
    );
}

#[test]
fn test_check_hw_error_healthy() {
    let (mut gripper, _, handler) = setup();
    assert_eq!(gripper.check_hw_error().unwrap(), HardwareStatus::Healthy);
    assert_eq!(gripper.check_hw_error_flags(), (false, true));
    assert_eq!(
        handler.calls()[0],
        BusCall::Read {
            id: 1,
            address: HARDWARE_ERROR_STATUS.address,
            length: 1
        }
    );
}

#[test]
fn test_check_hw_error_comm_failure() {
    let (mut gripper, _, handler) = setup();
    handler.set_comm_failure(Some(CommError::RxTimeout));
    assert!(gripper.check_hw_error().is_err());
    assert!(!gripper.check_hw_error_flags().1);
}

#[test]
fn test_check_hw_error_device_error_without_alert() {
    let (mut gripper, _, handler) = setup();
    handler.set_error_byte(0x07);
    let err = gripper.check_hw_error().unwrap_err();
    assert!(matches!(
        err,
        DriverError::Transport(TransportError::Device { .. })
    ));
    assert_eq!(gripper.check_hw_error_flags(), (false, false));
}

#[test]
fn test_alert_bit_with_error_number_is_not_a_fault() {
    let (mut gripper, _, handler) = setup();
    handler.set_register_byte(HARDWARE_ERROR_STATUS.address, 0x04);
    handler.set_error_byte(0x84);

    assert_eq!(gripper.check_hw_error_flags(), (false, false));

    // 写入被拒绝，不追加硬件错误状态读取
    handler.clear_calls();
    let err = gripper.close_gripper(400).unwrap_err();
    assert!(matches!(
        err,
        DriverError::Transport(TransportError::Device { .. })
    ));
    assert_eq!(handler.calls().len(), 1);
}

#[test]
fn test_alert_on_write_reports_hardware_fault() {
    let (mut gripper, _, handler) = setup();
    handler.latch_fault(0b0010_0000);

    let err = gripper.close_gripper(400).unwrap_err();
    match err {
        DriverError::HardwareFault(status) => {
            assert_eq!(status.cause(), Some(HardwareErrorCause::Overload));
        },
        other => panic!("expected hardware fault, got {other:?}"),
    }
    // 写入失败后紧接着读取硬件错误状态
    let calls = handler.calls();
    assert!(matches!(calls[0], BusCall::Write { address: 64, .. }));
    assert!(matches!(calls[1], BusCall::Read { address: 70, .. }));
    assert!(!gripper.is_torque_enabled());
}

#[test]
fn test_reboot_and_settle_clears_fault() {
    let (mut gripper, _, handler) = setup();
    handler.latch_fault(0b0000_0001);
    assert!(gripper.check_hw_error().unwrap().fault_present());

    let start = Instant::now();
    gripper.reboot_and_settle().unwrap();
    assert!(start.elapsed() >= Duration::from_millis(5));

    assert_eq!(gripper.check_hw_error().unwrap(), HardwareStatus::Healthy);
    gripper.set_defaults().unwrap();
}

// ============================================================================
// 动作原语
// ============================================================================

#[test]
fn test_open_gripper_negative_then_zero() {
    let (mut gripper, _, handler) = setup();
    let start = Instant::now();
    gripper.open_gripper().unwrap();
    assert!(start.elapsed() >= Duration::from_millis(5));

    assert_eq!(handler.byte_writes(TORQUE_ENABLE.address), vec![1]);
    let currents = handler.word_writes(GOAL_CURRENT.address);
    assert_eq!(currents, vec![-100, 0]);
    assert!(currents[0] < 0);
}

#[test]
fn test_close_gripper_has_no_release() {
    let (mut gripper, _, handler) = setup();
    gripper.close_gripper(400).unwrap();
    assert_eq!(handler.word_writes(GOAL_CURRENT.address), vec![400]);
    assert!(gripper.is_torque_enabled());
}

#[test]
fn test_latch_gripping_holds_then_releases() {
    let (mut gripper, _, handler) = setup();
    let start = Instant::now();
    gripper
        .latch_gripping(Duration::from_millis(20), 300)
        .unwrap();
    assert!(start.elapsed() >= Duration::from_millis(20));
    assert_eq!(handler.word_writes(GOAL_CURRENT.address), vec![300, 0]);
}

#[test]
fn test_motion_aborts_on_failure() {
    let (mut gripper, _, handler) = setup();
    gripper.torque_on().unwrap();
    handler.fail_next(CommError::TxFail);

    assert!(gripper.open_gripper().is_err());
    // 第一次写失败后不再继续
    assert_eq!(handler.word_writes(GOAL_CURRENT.address), vec![-100]);
}

#[test]
fn test_motion_turns_torque_on_once() {
    let (mut gripper, _, handler) = setup();
    gripper.close_gripper(200).unwrap();
    gripper.open_gripper().unwrap();
    gripper
        .latch_gripping(Duration::from_millis(1), 250)
        .unwrap();
    assert_eq!(handler.byte_writes(TORQUE_ENABLE.address), vec![1]);
}
