/// Settings page strings in every supported locale
use crate::images::upload::UploadError;
use crate::preferences::{ImageFit, Locale};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    SettingsTitle,
    Loading,
    Error,
    ImagesHeading,
    UploadLabel,
    Uploading,
    NoImages,
    DefaultBadge,
    Enabled,
    Delete,
    ConfirmDelete,
    DefaultProtected,
    LoadFailed,
    UploadFailed,
    ToggleFailed,
    DeleteFailed,
    ReorderFailed,
    SaveFailed,
    InvalidFileType,
    FileTooLarge,
    DisplayHeading,
    ImageFit,
    FitCover,
    FitContain,
    BackgroundColor,
    ClockHeading,
    ShowClock,
    Timezone,
    LanguageHeading,
}

impl Text {
    pub const ALL: [Text; 29] = [
        Text::SettingsTitle,
        Text::Loading,
        Text::Error,
        Text::ImagesHeading,
        Text::UploadLabel,
        Text::Uploading,
        Text::NoImages,
        Text::DefaultBadge,
        Text::Enabled,
        Text::Delete,
        Text::ConfirmDelete,
        Text::DefaultProtected,
        Text::LoadFailed,
        Text::UploadFailed,
        Text::ToggleFailed,
        Text::DeleteFailed,
        Text::ReorderFailed,
        Text::SaveFailed,
        Text::InvalidFileType,
        Text::FileTooLarge,
        Text::DisplayHeading,
        Text::ImageFit,
        Text::FitCover,
        Text::FitContain,
        Text::BackgroundColor,
        Text::ClockHeading,
        Text::ShowClock,
        Text::Timezone,
        Text::LanguageHeading,
    ];
}

/// Look up `text` in `locale`.
pub fn t(locale: Locale, text: Text) -> &'static str {
    match locale {
        Locale::En => en(text),
        Locale::Ko => ko(text),
        Locale::Ja => ja(text),
        Locale::De => de(text),
    }
}

pub fn fit_label(locale: Locale, fit: ImageFit) -> &'static str {
    match fit {
        ImageFit::Cover => t(locale, Text::FitCover),
        ImageFit::Contain => t(locale, Text::FitContain),
    }
}

/// User-facing text for a rejected upload
pub fn upload_error(locale: Locale, error: &UploadError) -> String {
    match error {
        UploadError::InvalidType(mime) => format!("{} ({})", t(locale, Text::InvalidFileType), mime),
        UploadError::TooLarge(_) => t(locale, Text::FileTooLarge).to_string(),
    }
}

fn en(text: Text) -> &'static str {
    match text {
        Text::SettingsTitle => "Screen Saver Settings",
        Text::Loading => "Loading...",
        Text::Error => "Error",
        Text::ImagesHeading => "Images",
        Text::UploadLabel => "Upload an image (JPEG, PNG or WebP, up to 10MB):",
        Text::Uploading => "Uploading",
        Text::NoImages => "No images yet.",
        Text::DefaultBadge => "Default",
        Text::Enabled => "Enabled",
        Text::Delete => "Delete",
        Text::ConfirmDelete => "Delete this image?",
        Text::DefaultProtected => "Default images cannot be deleted.",
        Text::LoadFailed => "Failed to load images",
        Text::UploadFailed => "Upload failed",
        Text::ToggleFailed => "Could not change the image",
        Text::DeleteFailed => "Delete failed",
        Text::ReorderFailed => "Could not reorder images",
        Text::SaveFailed => "Could not save settings",
        Text::InvalidFileType => "Invalid file type. Allowed types: JPEG, PNG, WebP",
        Text::FileTooLarge => "File too large. Maximum size: 10MB",
        Text::DisplayHeading => "Display",
        Text::ImageFit => "Image fit:",
        Text::FitCover => "Fill screen",
        Text::FitContain => "Show whole image",
        Text::BackgroundColor => "Background color:",
        Text::ClockHeading => "Clock",
        Text::ShowClock => "Show clock",
        Text::Timezone => "Timezone:",
        Text::LanguageHeading => "Language",
    }
}

fn ko(text: Text) -> &'static str {
    match text {
        Text::SettingsTitle => "스크린 세이버 설정",
        Text::Loading => "불러오는 중...",
        Text::Error => "오류",
        Text::ImagesHeading => "이미지",
        Text::UploadLabel => "이미지 업로드 (JPEG, PNG, WebP, 최대 10MB):",
        Text::Uploading => "업로드 중",
        Text::NoImages => "아직 이미지가 없습니다.",
        Text::DefaultBadge => "기본",
        Text::Enabled => "사용",
        Text::Delete => "삭제",
        Text::ConfirmDelete => "이 이미지를 삭제할까요?",
        Text::DefaultProtected => "기본 이미지는 삭제할 수 없습니다.",
        Text::LoadFailed => "이미지를 불러오지 못했습니다",
        Text::UploadFailed => "업로드에 실패했습니다",
        Text::ToggleFailed => "이미지를 변경하지 못했습니다",
        Text::DeleteFailed => "삭제에 실패했습니다",
        Text::ReorderFailed => "순서를 변경하지 못했습니다",
        Text::SaveFailed => "설정을 저장하지 못했습니다",
        Text::InvalidFileType => "지원하지 않는 파일 형식입니다. 허용 형식: JPEG, PNG, WebP",
        Text::FileTooLarge => "파일이 너무 큽니다. 최대 크기: 10MB",
        Text::DisplayHeading => "화면",
        Text::ImageFit => "이미지 맞춤:",
        Text::FitCover => "화면 채우기",
        Text::FitContain => "전체 이미지 보기",
        Text::BackgroundColor => "배경색:",
        Text::ClockHeading => "시계",
        Text::ShowClock => "시계 표시",
        Text::Timezone => "시간대:",
        Text::LanguageHeading => "언어",
    }
}

fn ja(text: Text) -> &'static str {
    match text {
        Text::SettingsTitle => "スクリーンセーバーの設定",
        Text::Loading => "読み込み中...",
        Text::Error => "エラー",
        Text::ImagesHeading => "画像",
        Text::UploadLabel => "画像をアップロード (JPEG、PNG、WebP、最大10MB):",
        Text::Uploading => "アップロード中",
        Text::NoImages => "画像がまだありません。",
        Text::DefaultBadge => "デフォルト",
        Text::Enabled => "有効",
        Text::Delete => "削除",
        Text::ConfirmDelete => "この画像を削除しますか?",
        Text::DefaultProtected => "デフォルト画像は削除できません。",
        Text::LoadFailed => "画像を読み込めませんでした",
        Text::UploadFailed => "アップロードに失敗しました",
        Text::ToggleFailed => "画像を変更できませんでした",
        Text::DeleteFailed => "削除に失敗しました",
        Text::ReorderFailed => "並べ替えできませんでした",
        Text::SaveFailed => "設定を保存できませんでした",
        Text::InvalidFileType => "無効なファイル形式です。使用可能: JPEG、PNG、WebP",
        Text::FileTooLarge => "ファイルが大きすぎます。最大サイズ: 10MB",
        Text::DisplayHeading => "表示",
        Text::ImageFit => "画像の表示方法:",
        Text::FitCover => "画面いっぱいに表示",
        Text::FitContain => "画像全体を表示",
        Text::BackgroundColor => "背景色:",
        Text::ClockHeading => "時計",
        Text::ShowClock => "時計を表示",
        Text::Timezone => "タイムゾーン:",
        Text::LanguageHeading => "言語",
    }
}

fn de(text: Text) -> &'static str {
    match text {
        Text::SettingsTitle => "Bildschirmschoner-Einstellungen",
        Text::Loading => "Wird geladen...",
        Text::Error => "Fehler",
        Text::ImagesHeading => "Bilder",
        Text::UploadLabel => "Bild hochladen (JPEG, PNG oder WebP, bis 10MB):",
        Text::Uploading => "Wird hochgeladen",
        Text::NoImages => "Noch keine Bilder.",
        Text::DefaultBadge => "Standard",
        Text::Enabled => "Aktiv",
        Text::Delete => "Löschen",
        Text::ConfirmDelete => "Dieses Bild löschen?",
        Text::DefaultProtected => "Standardbilder können nicht gelöscht werden.",
        Text::LoadFailed => "Bilder konnten nicht geladen werden",
        Text::UploadFailed => "Hochladen fehlgeschlagen",
        Text::ToggleFailed => "Bild konnte nicht geändert werden",
        Text::DeleteFailed => "Löschen fehlgeschlagen",
        Text::ReorderFailed => "Reihenfolge konnte nicht geändert werden",
        Text::SaveFailed => "Einstellungen konnten nicht gespeichert werden",
        Text::InvalidFileType => "Ungültiger Dateityp. Erlaubt: JPEG, PNG, WebP",
        Text::FileTooLarge => "Datei zu groß. Maximale Größe: 10MB",
        Text::DisplayHeading => "Anzeige",
        Text::ImageFit => "Bildanpassung:",
        Text::FitCover => "Bildschirm füllen",
        Text::FitContain => "Ganzes Bild zeigen",
        Text::BackgroundColor => "Hintergrundfarbe:",
        Text::ClockHeading => "Uhr",
        Text::ShowClock => "Uhr anzeigen",
        Text::Timezone => "Zeitzone:",
        Text::LanguageHeading => "Sprache",
    }
}
