#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// 200 through 300, both ends included.
    pub fn is_success(&self) -> bool {
        (200..=300).contains(&self.status)
    }
}
