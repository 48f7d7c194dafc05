use crate::error::{FirstbootError, Result};
use std::collections::BTreeSet;

/// 체크박스 하나로 함께 설치되는 패키지 묶음
#[derive(Debug)]
pub struct FeatureGroup {
    /// 프로파일에서 쓰는 식별자
    pub name: &'static str,
    /// 사람용 라벨
    pub label: &'static str,
    /// 이 그룹이 설치하는 패키지들 (한 번의 호출로 함께 설치)
    pub packages: &'static [&'static str],
}

/// 기능 그룹 카탈로그. 런타임에 발견하지 않는 고정 매핑이며,
/// 설치는 이 목록의 순서를 그대로 따릅니다.
pub const FEATURE_GROUPS: &[FeatureGroup] = &[
    FeatureGroup {
        name: "fonts",
        label: "Additional fonts",
        packages: &[
            "ttf-mscorefonts-installer",
            "fonts-crosextra-carlito",
            "fonts-crosextra-caladea",
        ],
    },
    FeatureGroup {
        name: "multimedia",
        label: "Multimedia support",
        packages: &[
            "libdvdcss2",
            "libavcodec-extra",
            "vlc",
            "gstreamer1.0-plugins-ugly",
            "gstreamer1.0-libav",
        ],
    },
    FeatureGroup {
        name: "virtualbox",
        label: "VirtualBox extension pack",
        packages: &["virtualbox-ext-pack"],
    },
    FeatureGroup {
        name: "gcompris",
        label: "GCompris learning suite",
        packages: &[
            "gcompris",
            "gcompris-sound-de",
            "gcompris-sound-en",
            "gcompris-sound-fr",
            "gcompris-sound-it",
        ],
    },
    FeatureGroup {
        name: "kstars",
        label: "KStars planetarium",
        packages: &["kstars", "kstars-data", "kstars-data-extra-tycho2"],
    },
    FeatureGroup {
        name: "stellarium",
        label: "Stellarium",
        packages: &["stellarium"],
    },
    FeatureGroup {
        name: "lyx",
        label: "LyX document processor",
        packages: &[
            "lyx",
            "fonts-lyx",
            "texlive-latex-extra",
            "texlive-fonts-recommended",
        ],
    },
    FeatureGroup {
        name: "scribus",
        label: "Scribus desktop publishing",
        packages: &["scribus", "scribus-template", "scribus-doc"],
    },
    FeatureGroup {
        name: "games",
        label: "Educational games",
        packages: &["supertux", "supertuxkart", "neverball", "xmoto"],
    },
];

/// 이름으로 카탈로그에서 그룹 찾기
pub fn find_group(name: &str) -> Option<&'static FeatureGroup> {
    FEATURE_GROUPS.iter().find(|g| g.name == name)
}

/// 사용자가 고른 그룹들의 불변 스냅샷
///
/// UI 상태와 실행을 분리하기 위해 실행 계획은 이 스냅샷만 받습니다.
/// 만들어진 뒤에는 바뀌지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    names: BTreeSet<String>,
}

impl Selection {
    /// 그룹 이름 목록에서 스냅샷 생성. 카탈로그에 없는 이름은 에러.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            if find_group(name).is_none() {
                return Err(FirstbootError::ConfigError(format!(
                    "unknown feature group: {name}"
                )));
            }
            set.insert(name.to_string());
        }
        Ok(Self { names: set })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
