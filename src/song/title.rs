use super::SongInfo;

/// Path-derived fields a title format can reference.
#[derive(Debug, Clone, Copy)]
pub struct TitleSource<'a> {
    pub full_path: &'a str,
    pub short_name: &'a str,
    pub extension: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Artist,
    Album,
    ShortName,
    FullPath,
    Extension,
    Title,
    Track,
    Year,
    Genre,
    Comments,
}

impl Field {
    fn from_directive(c: char) -> Option<Self> {
        Some(match c {
            'p' => Self::Artist,
            'a' => Self::Album,
            'f' => Self::ShortName,
            'F' => Self::FullPath,
            'e' => Self::Extension,
            't' => Self::Title,
            'n' => Self::Track,
            'y' => Self::Year,
            'g' => Self::Genre,
            'c' => Self::Comments,
            _ => return None,
        })
    }

    fn value<'a>(self, info: &'a SongInfo, source: &TitleSource<'a>) -> &'a str {
        let tag = |v: &'a Option<String>| v.as_deref().unwrap_or("");
        match self {
            Self::Artist => tag(&info.artist),
            Self::Album => tag(&info.album),
            Self::ShortName => source.short_name,
            Self::FullPath => source.full_path,
            Self::Extension => source.extension,
            Self::Title => tag(&info.title),
            Self::Track => tag(&info.track),
            Self::Year => tag(&info.year),
            Self::Genre => tag(&info.genre),
            Self::Comments => tag(&info.comments),
        }
    }
}

/// Expand a `%x` title format against a tag record.
///
/// Literal characters are copied; `%` plus one letter is replaced by the
/// matching field (missing fields expand to nothing). Unknown letters are
/// dropped along with their `%`, and a trailing lone `%` ends the output.
/// Without a format the title is "artist - title".
pub fn format_title(fmt: Option<&str>, info: &SongInfo, source: &TitleSource<'_>) -> String {
    let Some(fmt) = fmt.filter(|f| !f.is_empty()) else {
        return format!(
            "{} - {}",
            Field::Artist.value(info, source),
            Field::Title.value(info, source)
        );
    };

    let mut out = String::with_capacity(fmt.len());
    let mut chars = fmt.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(d) => {
                if let Some(field) = Field::from_directive(d) {
                    out.push_str(field.value(info, source));
                }
            }
            None => break,
        }
    }
    out
}
