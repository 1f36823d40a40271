//! 寄存器操作 debug 记录测试
//!
//! 用一个简单的 `Layer` 捕获事件。所有断言放在同一个测试里，避免并发测试共享 callsite 缓存。

use modelt_bus::mock::{MockPacketHandler, MockPort};
use modelt_driver::GripperBuilder;
use modelt_protocol::{CURRENT_LIMIT, CommError, GOAL_CURRENT};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl CaptureLayer {
    fn debug_messages(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == Level::DEBUG)
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

#[test]
fn test_debug_trace_records() {
    let capture = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let handler = MockPacketHandler::new();
        let spy = handler.clone();
        let mut gripper = GripperBuilder::new()
            .port("mock0")
            .build_with(MockPort::new("mock0"), handler)
            .unwrap();

        // debug 关闭：没有 debug 记录
        gripper.set_current_limit(350).unwrap();
        assert!(capture.debug_messages().is_empty());

        // debug 开启：每次成功写入恰好一条记录，包含地址与值
        gripper.set_debug(true);
        gripper.set_current_limit(123).unwrap();
        let messages = capture.debug_messages();
        assert_eq!(messages.len(), 1, "{messages:?}");
        assert!(messages[0].contains("123"));
        assert!(messages[0].contains(&CURRENT_LIMIT.address.to_string()));

        // 扭矩开启 + 闭合：两次写入，两条记录
        capture.clear();
        gripper.close_gripper(321).unwrap();
        let messages = capture.debug_messages();
        assert_eq!(messages.len(), 2, "{messages:?}");
        assert!(messages[1].contains("321"));
        assert!(messages[1].contains(&GOAL_CURRENT.address.to_string()));

        // 失败的写入不产生 debug 记录
        capture.clear();
        spy.fail_next(CommError::RxTimeout);
        assert!(gripper.close_gripper(10).is_err());
        assert!(capture.debug_messages().is_empty());

        // 读取同样记录
        capture.clear();
        gripper.check_hw_error().unwrap();
        assert_eq!(capture.debug_messages().len(), 1);
    });
}
