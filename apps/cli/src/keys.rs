//! 单键输入
//!
//! 会话循环只依赖 [`KeySource`]；终端实现每次读取时短暂进入 raw 模式。

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

/// 一次按键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Char(char),
    /// 方向键、功能键等
    Other,
}

/// 按键来源
pub trait KeySource {
    /// 阻塞直到读到一次按键
    fn read_key(&mut self) -> Result<Key>;
}

/// 终端按键来源（crossterm raw 模式）
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl TerminalKeys {
    pub fn new() -> Self {
        Self
    }
}

impl KeySource for TerminalKeys {
    fn read_key(&mut self) -> Result<Key> {
        terminal::enable_raw_mode()?;
        let key = read_key_raw();
        // 无论读取是否成功都要恢复终端
        terminal::disable_raw_mode()?;
        key
    }
}

fn read_key_raw() -> Result<Key> {
    loop {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        {
            if kind != KeyEventKind::Press {
                continue;
            }
            return Ok(map_key(code, modifiers));
        }
    }
}

fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Key {
    match code {
        KeyCode::Esc => Key::Escape,
        // raw 模式下 Ctrl+C 不产生 SIGINT，按退出处理
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Key::Escape,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Char('\n'),
        _ => Key::Other,
    }
}
