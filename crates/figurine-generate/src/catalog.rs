//! Localized prompt templates and classification messages

use figurine_core::Locale;

/// Per-locale text used while building prompts and reporting model refusals
pub(crate) struct Catalog {
    /// Instruction sent with the photo; `{name}` is replaced once
    prompt: &'static str,
    /// Reply blocked by the model's safety filter
    pub safety_filter: &'static str,
    /// Model answered with text only; `{text}` is replaced once
    text_only: &'static str,
    /// Every attempt failed with a transient error
    pub retries_exhausted: &'static str,
}

const VIETNAMESE: Catalog = Catalog {
    prompt: "Tạo một nhân vật mô hình tỉ lệ 1/7 được thương mại hóa từ nhân vật trong hình minh họa, theo phong cách và môi trường thực tế. Đặt nhân vật trên một đế acrylic trong suốt. Bên cạnh màn hình máy tính, hiển thị quá trình tạo mô hình ZBrush của nhân vật. Bên cạnh màn hình máy tính, đặt một hộp bao bì đồ chơi kiểu BANDAI có in tiêu đề {name} cùng với tác phẩm nghệ thuật gốc.",
    safety_filter: "Tạo hình ảnh không thành công do bộ lọc an toàn. Điều này có thể xảy ra với một số loại hình ảnh hoặc văn bản nhất định. Vui lòng thử sử dụng một ảnh hoặc tên khác.",
    text_only: "Mô hình AI đã trả lời bằng văn bản thay vì hình ảnh: \"{text}\"",
    retries_exhausted: "Cuộc gọi API Gemini không thành công sau tất cả các lần thử lại.",
};

const ENGLISH: Catalog = Catalog {
    prompt: "Create a 1/7 scale commercialized figure of the character in the illustration, in a realistic style and environment. Place the figure on clear acrylic stand. Next to the computer screen, display the ZBrush modeling process of the figure. Next to the computer screen, place a BANDAI-style toy packaging box with title {name} printed with the original artwork.",
    safety_filter: "Image generation failed due to safety filters. This can happen with certain types of images or text. Please try a different photo or name.",
    text_only: "The AI model responded with text instead of an image: \"{text}\"",
    retries_exhausted: "Gemini API call failed after all retries.",
};

impl Catalog {
    pub(crate) const fn for_locale(locale: &Locale) -> &'static Self {
        match *locale {
            Locale::Vietnamese => &VIETNAMESE,
            Locale::English => &ENGLISH,
        }
    }

    /// Instruction text for a figure labelled `name`
    pub(crate) fn prompt(&self, name: &str) -> String {
        self.prompt.replacen("{name}", name, 1)
    }

    /// Refusal message quoting the model's text verbatim
    pub(crate) fn text_only(&self, text: &str) -> String {
        self.text_only.replacen("{text}", text, 1)
    }
}
