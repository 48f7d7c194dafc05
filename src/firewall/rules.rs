use crate::error::Result;
use crate::firewall::validate;
use serde::{Deserialize, Serialize};

/// 방화벽 규칙의 프로토콜
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

/// 방화벽 허용 규칙 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub protocol: Protocol,
    /// 호스트네임, IPv4 주소 또는 IPv4 CIDR 블록
    pub target: String,
    /// "80" 또는 "443-8443" 형태
    pub port_range: String,
}

impl FirewallRule {
    pub fn new(protocol: Protocol, target: &str, port_range: &str) -> Self {
        Self {
            protocol,
            target: target.to_string(),
            port_range: port_range.to_string(),
        }
    }
}

/// 순서가 의미를 갖는 방화벽 규칙 목록
///
/// 필터 규칙으로 컴파일되면 first-match-wins이므로 추가/삭제/이동을
/// 거쳐도 순서가 보존되어야 합니다. 적용 직전에 반드시
/// `validate_all`을 통과한 사본만 파이프라인에 넘깁니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirewallRuleSet {
    rules: Vec<FirewallRule>,
}

impl FirewallRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<FirewallRule>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FirewallRule> {
        self.rules.iter()
    }

    pub fn get(&self, index: usize) -> Option<&FirewallRule> {
        self.rules.get(index)
    }

    pub fn add(&mut self, rule: FirewallRule) {
        self.rules.push(rule);
    }

    pub fn remove(&mut self, index: usize) -> Option<FirewallRule> {
        if index < self.rules.len() {
            Some(self.rules.remove(index))
        } else {
            None
        }
    }

    /// 모든 규칙을 순서대로 검사하고 첫 번째 오류를 반환
    ///
    /// 부작용이 없으므로 반복 호출해도 안전합니다.
    pub fn validate_all(&self) -> Result<()> {
        for (row, rule) in self.rules.iter().enumerate() {
            validate::check_target(&rule.target, row)?;
            validate::check_port_range(&rule.port_range, row)?;
        }
        Ok(())
    }

    /// 선택된 행들을 한 칸 위로 이동
    ///
    /// 선택에 첫 행이 포함되어 있으면 전체가 no-op입니다. 오름차순으로
    /// 스왑하므로 다중 선택의 상대 순서가 유지되고, 이어서
    /// `move_down`을 호출하면 원래 순서가 정확히 복원됩니다.
    /// 이동 후의 새 선택 인덱스를 반환합니다.
    pub fn move_up(&mut self, selected: &[usize]) -> Vec<usize> {
        let mut indices: Vec<usize> = selected
            .iter()
            .copied()
            .filter(|&i| i < self.rules.len())
            .collect();
        indices.sort_unstable();
        indices.dedup();

        if indices.is_empty() || indices[0] == 0 {
            return indices;
        }
        for &i in &indices {
            self.rules.swap(i - 1, i);
        }
        indices.iter().map(|&i| i - 1).collect()
    }

    /// 선택된 행들을 한 칸 아래로 이동 (`move_up`의 역연산)
    pub fn move_down(&mut self, selected: &[usize]) -> Vec<usize> {
        let mut indices: Vec<usize> = selected
            .iter()
            .copied()
            .filter(|&i| i < self.rules.len())
            .collect();
        indices.sort_unstable();
        indices.dedup();

        match indices.last() {
            None => return indices,
            Some(&last) if last + 1 == self.rules.len() => return indices,
            _ => {}
        }
        for &i in indices.iter().rev() {
            self.rules.swap(i, i + 1);
        }
        indices.iter().map(|&i| i + 1).collect()
    }

    /// 방화벽 적용 작업이 소비하는 화이트리스트 텍스트 생성
    ///
    /// 한 줄에 `프로토콜 대상 포트범위` 하나씩, 목록 순서 그대로.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            out.push_str(rule.protocol.as_str());
            out.push(' ');
            out.push_str(&rule.target);
            out.push(' ');
            out.push_str(&rule.port_range);
            out.push('\n');
        }
        out
    }
}
