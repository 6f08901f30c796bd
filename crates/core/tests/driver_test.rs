// Driver integration tests
//
// Exercise the session API against the in-process fake automation server.

use std::time::Duration;

use droid::testing::{FAKE_PNG, FakeElement, FakeServer};
use droid::{By, Capabilities, Driver, KeyCode};

fn caps() -> Capabilities {
	Capabilities::android()
		.device_name("emulator-5554")
		.app_package("com.example.app")
		.no_reset(true)
		.new_command_timeout(300)
}

fn form() -> Vec<FakeElement> {
	vec![
		FakeElement::edit_text().description("username"),
		FakeElement::edit_text().description("email"),
		FakeElement::edit_text().description("password"),
		FakeElement::button("Sign Up").description("Sign Up"),
	]
}

#[tokio::test]
async fn test_session_lifecycle() {
	let server = FakeServer::start(form()).await;

	let driver = Driver::start(server.url(), &caps()).await.unwrap();
	assert_eq!(driver.session_id(), "fake-session-1");
	assert_eq!(driver.capabilities()["appium:deviceName"], "emulator-5554");
	assert_eq!(server.sessions_created(), 1);

	let sent = server.capabilities().unwrap();
	assert_eq!(sent["platformName"], "Android");
	assert_eq!(sent["appium:noReset"], true);
	assert_eq!(sent["appium:newCommandTimeout"], 300);

	driver.quit().await.unwrap();
	assert_eq!(server.sessions_deleted(), 1);
}

#[tokio::test]
async fn test_find_click_and_type() {
	let server = FakeServer::start(form()).await;
	let driver = Driver::start(server.url(), &caps()).await.unwrap();

	let fields = driver.find_elements(&By::class_name("android.widget.EditText")).await.unwrap();
	assert_eq!(fields.len(), 3);

	fields[0].click().await.unwrap();
	fields[0].send_keys("TestUser123").await.unwrap();
	assert_eq!(fields[0].text().await.unwrap(), "TestUser123");
	assert_eq!(server.field_text(0).as_deref(), Some("TestUser123"));

	let button = driver.find_element(&By::description_contains("Sign")).await.unwrap();
	button.click().await.unwrap();
	assert_eq!(server.clicks(), vec!["username".to_string(), "Sign Up".to_string()]);

	driver.quit().await.unwrap();
}

#[tokio::test]
async fn test_tab_moves_active_element() {
	let server = FakeServer::start(form()).await;
	let driver = Driver::start(server.url(), &caps()).await.unwrap();

	let first = driver.find_element(&By::class_name("android.widget.EditText")).await.unwrap();
	first.click().await.unwrap();

	driver.press_keycode(KeyCode::TAB).await.unwrap();
	let active = driver.active_element().await.unwrap();
	active.send_keys("user1234@test.com").await.unwrap();

	assert_eq!(server.field_text(1).as_deref(), Some("user1234@test.com"));
	assert_eq!(server.keycodes(), vec![61]);

	driver.quit().await.unwrap();
}

#[tokio::test]
async fn test_missing_element_is_no_such_element() {
	let server = FakeServer::start(form()).await;
	let driver = Driver::start(server.url(), &caps()).await.unwrap();

	let err = driver.find_element(&By::accessibility_id("CartIcon")).await.unwrap_err();
	assert!(err.is_no_such_element(), "{err}");

	let none = driver.find_elements(&By::class_name("android.widget.CheckBox")).await.unwrap();
	assert!(none.is_empty());

	let err = driver.active_element().await.unwrap_err();
	assert!(err.is_no_such_element(), "{err}");

	driver.quit().await.unwrap();
}

#[tokio::test]
async fn test_presence_wait_sees_revealed_element() {
	let screen = vec![
		FakeElement::button("Sign Up")
			.description("Sign Up")
			.reveals(vec![FakeElement::new("android.view.View").description("CartIcon")]),
	];
	let server = FakeServer::start(screen).await;
	let driver = Driver::start(server.url(), &caps()).await.unwrap();

	let wait = driver.wait(Duration::from_millis(100)).poll_interval(Duration::from_millis(10));
	let err = wait.presence_of(&By::accessibility_id("CartIcon")).await.unwrap_err();
	assert!(err.is_timeout(), "{err}");

	driver.find_element(&By::accessibility_id("Sign Up")).await.unwrap().click().await.unwrap();
	let marker = wait.presence_of(&By::accessibility_id("CartIcon")).await.unwrap();
	assert!(!marker.id().is_empty());

	driver.quit().await.unwrap();
}

#[tokio::test]
async fn test_presence_of_all_times_out_on_empty_screen() {
	let server = FakeServer::start(Vec::new()).await;
	let driver = Driver::start(server.url(), &caps()).await.unwrap();

	let err = driver
		.wait(Duration::from_millis(50))
		.poll_interval(Duration::from_millis(10))
		.presence_of_all(&By::class_name("android.widget.EditText"))
		.await
		.unwrap_err();
	assert!(err.is_timeout(), "{err}");
	assert!(err.to_string().contains("android.widget.EditText"));

	driver.quit().await.unwrap();
}

#[tokio::test]
async fn test_screenshot_to_file_creates_directories() {
	let server = FakeServer::start(form()).await;
	let driver = Driver::start(server.url(), &caps()).await.unwrap();
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("docs").join("results").join("shot.png");

	let bytes = driver.screenshot_to_file(&path).await.unwrap();
	assert_eq!(bytes, FAKE_PNG);
	assert_eq!(std::fs::read(&path).unwrap(), FAKE_PNG);
	assert_eq!(server.screenshots(), 1);

	driver.quit().await.unwrap();
}

#[tokio::test]
async fn test_commands_after_remote_session_loss_fail() {
	let server = FakeServer::start(form()).await;
	let driver = Driver::start(server.url(), &caps()).await.unwrap();
	let other = Driver::start(server.url(), &caps()).await.unwrap();

	// The fake server keeps one live session; the second replaced the first.
	let err = driver.find_elements(&By::class_name("android.widget.EditText")).await.unwrap_err();
	assert!(err.is_invalid_session(), "{err}");

	other.quit().await.unwrap();
}
