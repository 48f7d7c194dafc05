use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "firstboot")]
#[command(version)]
#[command(about = "First-boot configuration wizard for live exam systems", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// 디버그 모드
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 프로파일을 검증하고 구성 파이프라인 실행
    Apply {
        /// 프로파일 경로 (미지정시 기본 경로)
        profile: Option<PathBuf>,

        /// 확인 없이 바로 실행
        #[arg(short = 'y', long)]
        yes: bool,

        /// 속성 파일 경로 재지정 (기본: /etc/lernstickWelcome)
        #[arg(long)]
        properties: Option<PathBuf>,
    },

    /// 프로파일의 방화벽 규칙만 검사 (적용 없음)
    Validate {
        /// 프로파일 경로 (미지정시 기본 경로)
        profile: Option<PathBuf>,
    },

    /// squid 접근 로그를 감시하며 차단된 사이트를 출력
    Watch {
        /// 접근 로그 경로
        log: PathBuf,

        /// 줄 단위 JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 기능 그룹 카탈로그 출력
    Groups {
        /// dpkg로 설치 여부 확인
        #[arg(long)]
        installed: bool,
    },
}
