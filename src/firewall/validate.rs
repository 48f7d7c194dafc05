use crate::error::{FirstbootError, Result, RuleColumn};
use once_cell::sync::Lazy;
use regex::Regex;

static IPV4_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})$").unwrap());

static HOSTNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .unwrap()
});

static PORT_RANGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,5})(?:-(\d{1,5}))?$").unwrap());

fn is_ipv4(value: &str) -> bool {
    match IPV4_RE.captures(value) {
        Some(caps) => (1..=4).all(|i| caps[i].parse::<u32>().map(|o| o <= 255).unwrap_or(false)),
        None => false,
    }
}

fn is_cidr(value: &str) -> bool {
    match value.split_once('/') {
        Some((addr, prefix)) => {
            is_ipv4(addr) && prefix.parse::<u32>().map(|p| p <= 32).unwrap_or(false)
        }
        None => false,
    }
}

fn is_hostname(value: &str) -> bool {
    value.len() <= 253 && HOSTNAME_RE.is_match(value)
}

/// 방화벽 대상 검사: IPv4 주소, IPv4 CIDR 블록, 호스트네임만 허용
///
/// 어느 행이 틀렸는지 호출자가 바로 가리킬 수 있도록 행 번호를 에러에
/// 담습니다. 빈 문자열은 유효하지 않습니다.
pub fn check_target(value: &str, row: usize) -> Result<()> {
    let value = value.trim();
    let valid = if value.is_empty() {
        false
    } else if IPV4_RE.is_match(value) {
        // 점 4개짜리 숫자 형태는 주소로만 판정. 256.1.1.1 같은 입력이
        // 호스트네임으로 재해석되어 통과하면 안 됨.
        is_ipv4(value)
    } else {
        is_cidr(value) || is_hostname(value)
    };

    if valid {
        Ok(())
    } else {
        Err(FirstbootError::Validation {
            column: RuleColumn::Target,
            row,
        })
    }
}

/// 포트 범위 검사: 1~65535 단일 포트 또는 `시작-끝` (시작 ≤ 끝)
pub fn check_port_range(value: &str, row: usize) -> Result<()> {
    let invalid = || FirstbootError::Validation {
        column: RuleColumn::PortRange,
        row,
    };

    let caps = PORT_RANGE_RE.captures(value.trim()).ok_or_else(invalid)?;
    let low: u32 = caps[1].parse().map_err(|_| invalid())?;
    if low < 1 || low > 65535 {
        return Err(invalid());
    }
    if let Some(high) = caps.get(2) {
        let high: u32 = high.as_str().parse().map_err(|_| invalid())?;
        if high > 65535 || low > high {
            return Err(invalid());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleColumn;

    #[test]
    fn test_valid_targets() {
        assert!(check_target("10.0.0.5", 0).is_ok());
        assert!(check_target("192.168.1.0/24", 0).is_ok());
        assert!(check_target("example.org", 0).is_ok());
        assert!(check_target("ftp.example.org", 0).is_ok());
        assert!(check_target("localhost", 0).is_ok());
    }

    #[test]
    fn test_invalid_targets() {
        assert!(check_target("", 0).is_err());
        assert!(check_target("   ", 0).is_err());
        assert!(check_target("not a host!!", 0).is_err());
        assert!(check_target("256.1.1.1", 0).is_err());
        assert!(check_target("10.0.0.0/33", 0).is_err());
        assert!(check_target("-leading.example.org", 0).is_err());
    }

    #[test]
    fn test_dotted_quad_is_never_a_hostname() {
        // 옥텟이 범위를 벗어난 주소가 호스트네임 규칙으로 빠져
        // 통과하면 안 됨
        assert!(check_target("256.1.1.1", 0).is_err());
        assert!(check_target("1.2.3.999", 0).is_err());
        assert!(check_target("255.255.255.255", 0).is_ok());
    }

    #[test]
    fn test_target_error_carries_row_and_column() {
        match check_target("", 3) {
            Err(crate::error::FirstbootError::Validation { column, row }) => {
                assert_eq!(column, RuleColumn::Target);
                assert_eq!(row, 3);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_valid_port_ranges() {
        assert!(check_port_range("80", 0).is_ok());
        assert!(check_port_range("1-65535", 0).is_ok());
        assert!(check_port_range("443-8443", 0).is_ok());
        assert!(check_port_range("65535", 0).is_ok());
    }

    #[test]
    fn test_invalid_port_ranges() {
        assert!(check_port_range("0", 0).is_err());
        assert!(check_port_range("70000", 0).is_err());
        assert!(check_port_range("100-50", 0).is_err());
        assert!(check_port_range("abc", 0).is_err());
        assert!(check_port_range("", 0).is_err());
        assert!(check_port_range("80-", 0).is_err());
        assert!(check_port_range("1-70000", 0).is_err());
    }

    #[test]
    fn test_port_range_error_carries_row_and_column() {
        match check_port_range("100-50", 7) {
            Err(crate::error::FirstbootError::Validation { column, row }) => {
                assert_eq!(column, RuleColumn::PortRange);
                assert_eq!(row, 7);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
