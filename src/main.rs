fn main() {
    pokefocus_lib::run()
}
