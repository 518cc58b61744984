/// GET / - Service banner
pub async fn page() -> &'static str {
    "Car Doctor"
}
